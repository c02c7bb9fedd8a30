use std::path::PathBuf;

use thiserror::Error;

use crate::markers::MarkerKind;
use crate::parsing::rope::LineRange;

/// Failures of the document-source collaborator.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Document is not open: {}", .0.display())]
    NotOpen(PathBuf),
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} is not valid UTF-8: {source}", .path.display())]
    InvalidUtf8 {
        path: PathBuf,
        source: std::str::Utf8Error,
    },
    #[error("{} changed concurrently: expected version {expected}, found {actual}", .path.display())]
    VersionMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
    #[error("lines {}..{} are outside {} ({line_count} lines)", .lines.start + 1, .lines.end, .path.display())]
    LineOutOfRange {
        path: PathBuf,
        lines: LineRange,
        line_count: usize,
    },
}

/// Where an accept-at-cursor was refused because the side is not implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbiguousBlock {
    CommonAncestors,
    Splitter,
}

impl std::fmt::Display for AmbiguousBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmbiguousBlock::CommonAncestors => write!(f, "common ancestors block"),
            AmbiguousBlock::Splitter => write!(f, "merge conflict splitter"),
        }
    }
}

/// Failures of an accept action.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The document no longer has the recorded marker at the recorded line.
    /// Recovery is a fresh parse and a new decision.
    #[error("conflict is out of date: expected {expected:?} marker at line {}", .line + 1)]
    StaleRange { line: usize, expected: MarkerKind },
    #[error("Editor cursor is not within a merge conflict")]
    NoConflictAtCursor { line: usize },
    #[error(
        "Editor cursor is within the {block}, please move it to either the \"current\" or \"incoming\" block"
    )]
    AmbiguousCursorPosition { line: usize, block: AmbiguousBlock },
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Why navigation did not move.
#[derive(Debug, Error)]
pub enum NavigateError {
    #[error("No merge conflicts found in this file")]
    NoConflicts,
    #[error("No other merge conflicts within this file")]
    NoOtherConflict,
    #[error(transparent)]
    Source(#[from] SourceError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No merge conflicts found in {}", .0.display())]
    NoConflicts(PathBuf),
    #[error(transparent)]
    Source(#[from] SourceError),
}

#[derive(Debug, Error)]
pub enum VirtualIdError {
    #[error("unknown virtual document scheme '{0}'")]
    UnknownScheme(String),
    #[error("virtual document id has no region query: {0}")]
    MissingQuery(String),
    #[error("invalid region query: {0}")]
    InvalidQuery(#[from] serde_json::Error),
}
