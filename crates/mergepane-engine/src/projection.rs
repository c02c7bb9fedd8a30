//! Line-aligned projections of a conflicted document onto one side.
//!
//! A projection keeps every non-conflicting line at its original line
//! number. Each conflict region is replaced by the chosen side's content
//! followed by blank padding lines, so the projection and the merged
//! document have the same line count and scroll together.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::VirtualIdError;
use crate::parsing::rope::LineRange;
use crate::parsing::{ConflictRegion, Side};

/// The two line ranges a projection needs from one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedRegion {
    /// Content lines of the chosen side.
    pub chosen: LineRange,
    /// Header line through footer line.
    pub whole: LineRange,
}

impl ProjectedRegion {
    pub fn of(region: &ConflictRegion, side: Side) -> Self {
        Self {
            chosen: region.section(side).lines,
            whole: region.range,
        }
    }
}

/// Projection of `document` with each region reduced to `side`.
pub fn reconstruct(document: &Document, regions: &[ConflictRegion], side: Side) -> String {
    let projected: Vec<_> = regions
        .iter()
        .map(|r| ProjectedRegion::of(r, side))
        .collect();
    reconstruct_ranges(document, &projected)
}

/// Rebuild a projection from an identifier alone, without re-parsing.
pub fn reconstruct_from_id(document: &Document, id: &VirtualDocumentId) -> String {
    reconstruct_ranges(document, &id.regions)
}

fn reconstruct_ranges(document: &Document, regions: &[ProjectedRegion]) -> String {
    let line_count = document.line_count();
    let mut out = String::with_capacity(document.len());
    let mut next = 0;

    for region in regions {
        let whole = region.whole;
        let chosen = region.chosen;
        if whole.start < next
            || whole.end > line_count
            || chosen.start < whole.start
            || chosen.end > whole.end
        {
            log::debug!(
                "skipping projected region {}..{}: out of order or out of range",
                whole.start,
                whole.end
            );
            continue;
        }

        out.push_str(&document.text_in_lines(LineRange::new(next, whole.start)));
        out.push_str(&document.text_in_lines(chosen));

        let mut padding = whole.len() - chosen.len();
        let ends_document = whole.end == line_count;
        if ends_document && document.line_break(whole.end - 1).is_empty() {
            padding = padding.saturating_sub(1);
        }
        let eol = match document.line_break(whole.start) {
            "" => "\n",
            eol => eol,
        };
        for _ in 0..padding {
            out.push_str(eol);
        }

        next = whole.end;
    }

    out.push_str(&document.text_in_lines(LineRange::new(next, line_count)));
    out
}

/// Prepend `lines` blank lines. Presentation layers use this to line a
/// projection up with a view that reserves rows above the document.
pub fn with_leading_padding(text: &str, lines: usize) -> String {
    let mut out = "\n".repeat(lines);
    out.push_str(text);
    out
}

#[derive(Serialize, Deserialize)]
struct RegionQuery {
    ranges: Vec<ProjectedRegion>,
}

/// Identifier of a read-only projection: `(path, side, regions snapshot)`.
///
/// Renders as `merge-conflict.conflict-<side>:<path>?<json>` where the JSON
/// query holds the chosen and whole line ranges of every region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDocumentId {
    pub path: PathBuf,
    pub side: Side,
    pub regions: Vec<ProjectedRegion>,
}

impl VirtualDocumentId {
    pub const SCHEME_CURRENT: &'static str = "merge-conflict.conflict-current";
    pub const SCHEME_INCOMING: &'static str = "merge-conflict.conflict-incoming";

    pub fn new(path: &Path, side: Side, regions: &[ConflictRegion]) -> Self {
        Self {
            path: path.to_path_buf(),
            side,
            regions: regions
                .iter()
                .map(|r| ProjectedRegion::of(r, side))
                .collect(),
        }
    }

    pub fn scheme(&self) -> &'static str {
        match self.side {
            Side::Current => Self::SCHEME_CURRENT,
            Side::Incoming => Self::SCHEME_INCOMING,
        }
    }

    pub fn parse(id: &str) -> Result<Self, VirtualIdError> {
        let (scheme, rest) = id
            .split_once(':')
            .ok_or_else(|| VirtualIdError::UnknownScheme(id.to_string()))?;
        let side = match scheme {
            Self::SCHEME_CURRENT => Side::Current,
            Self::SCHEME_INCOMING => Side::Incoming,
            other => return Err(VirtualIdError::UnknownScheme(other.to_string())),
        };
        let (path, query) = rest
            .rsplit_once('?')
            .ok_or_else(|| VirtualIdError::MissingQuery(id.to_string()))?;
        let query: RegionQuery = serde_json::from_str(query)?;

        Ok(Self {
            path: PathBuf::from(path),
            side,
            regions: query.ranges,
        })
    }
}

impl fmt::Display for VirtualDocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = serde_json::to_string(&RegionQuery {
            ranges: self.regions.clone(),
        })
        .map_err(|_| fmt::Error)?;
        write!(f, "{}:{}?{}", self.scheme(), self.path.display(), query)
    }
}
