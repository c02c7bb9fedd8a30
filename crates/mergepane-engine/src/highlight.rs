//! Line ranges to colour in the merged document and in each projection.

use serde::Serialize;

use crate::markers::MarkerKind;
use crate::parsing::rope::LineRange;
use crate::parsing::{ConflictRegion, Section, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HighlightKind {
    Marker(MarkerKind),
    Current,
    CommonAncestors,
    Incoming,
}

impl From<Side> for HighlightKind {
    fn from(side: Side) -> Self {
        match side {
            Side::Current => HighlightKind::Current,
            Side::Incoming => HighlightKind::Incoming,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub kind: HighlightKind,
    pub lines: LineRange,
}

impl Highlight {
    /// Shift down by `lines`, for views that reserve rows above the text.
    #[must_use]
    pub fn offset(self, lines: usize) -> Self {
        Self {
            kind: self.kind,
            lines: LineRange::new(self.lines.start + lines, self.lines.end + lines),
        }
    }
}

/// Highlights for the live document, in document order. Empty sections
/// contribute no content highlight.
pub fn merged_highlights(regions: &[ConflictRegion]) -> Vec<Highlight> {
    let mut out = Vec::new();
    for region in regions {
        out.push(marker(MarkerKind::Header, region.header));
        push_content(&mut out, HighlightKind::Current, &region.current);
        for ancestors in &region.common_ancestors {
            out.push(marker(MarkerKind::CommonAncestors, ancestors.header));
            push_content(&mut out, HighlightKind::CommonAncestors, ancestors);
        }
        out.push(marker(MarkerKind::Splitter, region.splitter));
        push_content(&mut out, HighlightKind::Incoming, &region.incoming);
        out.push(marker(MarkerKind::Footer, region.footer));
    }
    out
}

/// Where the chosen side's content sits inside the projection for `side`:
/// it starts on the region's header line.
pub fn projection_highlights(regions: &[ConflictRegion], side: Side) -> Vec<Highlight> {
    regions
        .iter()
        .filter_map(|region| {
            let len = region.section(side).lines.len();
            (len > 0).then(|| Highlight {
                kind: side.into(),
                lines: LineRange::new(region.range.start, region.range.start + len),
            })
        })
        .collect()
}

fn marker(kind: MarkerKind, lines: LineRange) -> Highlight {
    Highlight {
        kind: HighlightKind::Marker(kind),
        lines,
    }
}

fn push_content(out: &mut Vec<Highlight>, kind: HighlightKind, section: &Section) {
    if !section.lines.is_empty() {
        out.push(Highlight {
            kind,
            lines: section.lines,
        });
    }
}
