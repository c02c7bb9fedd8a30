pub mod cache;
pub mod document;
pub mod error;
pub mod highlight;
pub mod markers;
pub mod navigation;
pub mod parsing;
pub mod patch;
pub mod projection;
pub mod resolution;
pub mod session;
pub mod source;
pub mod tracker;

// Re-export key types for easier usage
pub use cache::VersionedCache;
pub use document::Document;
pub use error::*;
pub use highlight::{Highlight, HighlightKind, merged_highlights, projection_highlights};
pub use markers::{ConflictMarker, MarkerKind};
pub use navigation::{Direction, find_containing, find_for_navigation, find_next, find_previous};
pub use parsing::{ConflictRegion, LineRange, Section, Side, Span, parse_conflicts, parse_str};
pub use patch::Patch;
pub use projection::{
    ProjectedRegion, VirtualDocumentId, reconstruct, reconstruct_from_id, with_leading_padding,
};
pub use resolution::{
    AcceptDecision, commit_edit, commit_in_source, decision_at_cursor, side_at_cursor,
};
pub use session::{MergeSession, Pane};
pub use source::{DocumentSource, Workspace};
pub use tracker::{ConflictTracker, Conflicts, TrackerHandle};
