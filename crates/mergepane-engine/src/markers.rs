//! Git conflict marker grammar.
//!
//! All knowledge of the four marker prefixes lives here. A line is a marker
//! when its first seven characters are one of the prefixes; whatever follows
//! on the same line is a free-form label (branch name, commit, file).

use serde::Serialize;

/// The structural role of a conflict marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MarkerKind {
    /// `<<<<<<<` opens a conflict and names the current side.
    Header,
    /// `|||||||` opens the optional diff3 common-ancestors block.
    CommonAncestors,
    /// `=======` separates the current side from the incoming side.
    Splitter,
    /// `>>>>>>>` closes a conflict and names the incoming side.
    Footer,
}

pub struct ConflictMarker;

impl ConflictMarker {
    pub const HEADER: &'static str = "<<<<<<<";
    pub const COMMON_ANCESTORS: &'static str = "|||||||";
    pub const SPLITTER: &'static str = "=======";
    pub const FOOTER: &'static str = ">>>>>>>";

    pub fn prefix(kind: MarkerKind) -> &'static str {
        match kind {
            MarkerKind::Header => Self::HEADER,
            MarkerKind::CommonAncestors => Self::COMMON_ANCESTORS,
            MarkerKind::Splitter => Self::SPLITTER,
            MarkerKind::Footer => Self::FOOTER,
        }
    }

    /// Classifies a line (with or without its line break) as a marker.
    pub fn sig(line: &str) -> Option<MarkerKind> {
        if line.starts_with(Self::HEADER) {
            Some(MarkerKind::Header)
        } else if line.starts_with(Self::COMMON_ANCESTORS) {
            Some(MarkerKind::CommonAncestors)
        } else if line.starts_with(Self::SPLITTER) {
            Some(MarkerKind::Splitter)
        } else if line.starts_with(Self::FOOTER) {
            Some(MarkerKind::Footer)
        } else {
            None
        }
    }

    /// The label following a marker of `kind`, with the line break and one
    /// separating space removed. `None` when the line carries no label or is
    /// not a marker of that kind.
    pub fn label(line: &str, kind: MarkerKind) -> Option<&str> {
        let rest = line
            .trim_end_matches(['\r', '\n'])
            .strip_prefix(Self::prefix(kind))?;
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        if rest.is_empty() { None } else { Some(rest) }
    }
}
