//! # Snapshot Testing Support
//!
//! Utilities for testing the parser via snapshot assertions and invariant checks.
//!
//! - **`normalize`**: converts parsed regions into a stable `Snap` that renders
//!   as compact text for `insta` snapshots
//! - **`invariants`**: runtime checks for parser correctness (spans in bounds,
//!   markers strictly ordered, sections non-overlapping and marker-free)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
