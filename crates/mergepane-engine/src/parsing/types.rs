use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::parsing::rope::span::{LineRange, Span};

/// Which side of a conflict a caller is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The block between `<<<<<<<` and the next marker.
    Current,
    /// The block between `=======` and `>>>>>>>`.
    Incoming,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Current => write!(f, "current"),
            Side::Incoming => write!(f, "incoming"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown side '{0}', expected 'current' or 'incoming'")]
pub struct ParseSideError(String);

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(Side::Current),
            "incoming" => Ok(Side::Incoming),
            other => Err(ParseSideError(other.to_string())),
        }
    }
}

/// A named block inside a conflict: current, incoming or common ancestors.
///
/// # Invariants
///
/// - `lines` lies strictly between the section's bounding marker lines
/// - `content` covers exactly the bytes of `lines`, line breaks included
/// - `decorator.start == content.start` and `decorator.end <= content.end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Text after the section's naming marker (`HEAD`, a branch, a commit).
    pub label: Option<String>,
    /// The marker line that names this section. For the incoming side this
    /// is the footer, as git puts the incoming name there.
    pub header: LineRange,
    /// Content lines, excluding every marker line.
    pub lines: LineRange,
    /// Byte span of the content, including the last line's line break.
    pub content: Span,
    /// Byte span for highlighting: the content without its final line break.
    pub decorator: Span,
    /// True when the content has zero characters.
    pub is_empty: bool,
}

/// One parsed git-style conflict block.
///
/// # Invariants
///
/// - `header.start < common_ancestors[0].header.start < splitter.start < footer.end`
/// - `current`, `common_ancestors` and `incoming` content ranges never overlap
/// - `range` runs from the header line through the footer line inclusive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictRegion {
    /// Header line through footer line, inclusive.
    pub range: LineRange,
    /// Byte span from the start of the header through the footer's line break.
    pub span: Span,
    pub header: LineRange,
    pub splitter: LineRange,
    pub footer: LineRange,
    pub current: Section,
    /// The diff3 `|||||||` block, zero or one entries.
    pub common_ancestors: Vec<Section>,
    pub incoming: Section,
}

impl ConflictRegion {
    pub fn section(&self, side: Side) -> &Section {
        match side {
            Side::Current => &self.current,
            Side::Incoming => &self.incoming,
        }
    }

    /// The first marker after the current block: the common-ancestors marker
    /// when present, otherwise the splitter.
    pub fn token_after_current(&self) -> LineRange {
        self.common_ancestors
            .first()
            .map(|s| s.header)
            .unwrap_or(self.splitter)
    }

    /// Number of document lines the region occupies, markers included.
    pub fn line_count(&self) -> usize {
        self.range.len()
    }

    pub fn contains_line(&self, line: usize) -> bool {
        self.range.contains(line)
    }
}
