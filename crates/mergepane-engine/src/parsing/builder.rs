use crate::markers::MarkerKind;
use crate::parsing::rope::span::{LineRange, Span};

use super::{
    classify::LineClass,
    types::{ConflictRegion, Section},
};

/// A marker line seen while inside a conflict.
#[derive(Debug, Clone)]
struct MarkerLine {
    index: usize,
    line: Span,
    label: Option<String>,
}

impl MarkerLine {
    fn from_class(c: &LineClass) -> Self {
        Self {
            index: c.index,
            line: c.line,
            label: c.label.clone(),
        }
    }

    fn range(&self) -> LineRange {
        LineRange::line(self.index)
    }
}

/// A section whose content is still being accumulated.
#[derive(Debug, Clone, Copy)]
struct OpenSection {
    start: usize,
    first_line: usize,
    last_content_end: Option<usize>,
}

impl OpenSection {
    fn after(marker: &LineClass) -> Self {
        Self {
            start: marker.line.end,
            first_line: marker.index + 1,
            last_content_end: None,
        }
    }

    fn extend(&mut self, c: &LineClass) {
        self.last_content_end = Some(c.content_end);
    }

    /// Closes the section at `next`, the marker line that ends it.
    fn close(self, label: Option<String>, header: LineRange, next: &LineClass) -> Section {
        let content = Span {
            start: self.start,
            end: next.line.start,
        };
        Section {
            label,
            header,
            lines: LineRange::new(self.first_line, next.index),
            content,
            decorator: Span {
                start: self.start,
                end: self.last_content_end.unwrap_or(self.start),
            },
            is_empty: content.is_empty(),
        }
    }
}

#[derive(Debug)]
enum ScanState {
    Scanning,
    InCurrent {
        header: MarkerLine,
        current: OpenSection,
    },
    InCommonAncestors {
        header: MarkerLine,
        current: Section,
        marker: MarkerLine,
        ancestors: OpenSection,
    },
    InIncoming {
        header: MarkerLine,
        current: Section,
        common_ancestors: Vec<Section>,
        splitter: MarkerLine,
        incoming: OpenSection,
    },
}

impl ScanState {
    fn opened_at(&self) -> Option<usize> {
        match self {
            ScanState::Scanning => None,
            ScanState::InCurrent { header, .. }
            | ScanState::InCommonAncestors { header, .. }
            | ScanState::InIncoming { header, .. } => Some(header.index),
        }
    }
}

/// Single-pass state machine turning classified lines into conflict regions.
///
/// Regions are emitted only once their footer is seen. A region interrupted
/// by another header, closed by a footer before any splitter, or cut off by
/// end of input is discarded.
pub struct ConflictBuilder {
    state: ScanState,
    out: Vec<ConflictRegion>,
}

impl ConflictBuilder {
    pub fn new() -> Self {
        Self {
            state: ScanState::Scanning,
            out: vec![],
        }
    }

    pub fn push(&mut self, c: &LineClass) {
        let state = std::mem::replace(&mut self.state, ScanState::Scanning);

        self.state = match (state, c.marker) {
            (ScanState::Scanning, Some(MarkerKind::Header)) => Self::open(c),
            (ScanState::Scanning, _) => ScanState::Scanning,

            // Never merge two conflicts: restart at the new header.
            (in_conflict, Some(MarkerKind::Header)) => {
                Self::skip(&in_conflict, c, "a new header");
                Self::open(c)
            }

            (ScanState::InCurrent { header, current }, Some(MarkerKind::CommonAncestors)) => {
                let current = current.close(header.label.clone(), header.range(), c);
                ScanState::InCommonAncestors {
                    header,
                    current,
                    marker: MarkerLine::from_class(c),
                    ancestors: OpenSection::after(c),
                }
            }
            (ScanState::InCurrent { header, current }, Some(MarkerKind::Splitter)) => {
                let current = current.close(header.label.clone(), header.range(), c);
                ScanState::InIncoming {
                    header,
                    current,
                    common_ancestors: vec![],
                    splitter: MarkerLine::from_class(c),
                    incoming: OpenSection::after(c),
                }
            }
            (
                ScanState::InCommonAncestors {
                    header,
                    current,
                    marker,
                    ancestors,
                },
                Some(MarkerKind::Splitter),
            ) => {
                let ancestors = ancestors.close(marker.label.clone(), marker.range(), c);
                ScanState::InIncoming {
                    header,
                    current,
                    common_ancestors: vec![ancestors],
                    splitter: MarkerLine::from_class(c),
                    incoming: OpenSection::after(c),
                }
            }

            // A footer with no splitter cannot form a region.
            (
                in_conflict @ (ScanState::InCurrent { .. } | ScanState::InCommonAncestors { .. }),
                Some(MarkerKind::Footer),
            ) => {
                Self::skip(&in_conflict, c, "a footer before any splitter");
                ScanState::Scanning
            }

            (
                ScanState::InIncoming {
                    header,
                    current,
                    common_ancestors,
                    splitter,
                    incoming,
                },
                Some(MarkerKind::Footer),
            ) => {
                let incoming = incoming.close(c.label.clone(), LineRange::line(c.index), c);
                self.out.push(ConflictRegion {
                    range: LineRange::new(header.index, c.index + 1),
                    span: Span {
                        start: header.line.start,
                        end: c.line.end,
                    },
                    header: header.range(),
                    splitter: splitter.range(),
                    footer: LineRange::line(c.index),
                    current,
                    common_ancestors,
                    incoming,
                });
                ScanState::Scanning
            }

            (ScanState::InCurrent { header, mut current }, _) => {
                current.extend(c);
                ScanState::InCurrent { header, current }
            }
            (
                ScanState::InCommonAncestors {
                    header,
                    current,
                    marker,
                    mut ancestors,
                },
                _,
            ) => {
                ancestors.extend(c);
                ScanState::InCommonAncestors {
                    header,
                    current,
                    marker,
                    ancestors,
                }
            }
            (
                ScanState::InIncoming {
                    header,
                    current,
                    common_ancestors,
                    splitter,
                    mut incoming,
                },
                _,
            ) => {
                incoming.extend(c);
                ScanState::InIncoming {
                    header,
                    current,
                    common_ancestors,
                    splitter,
                    incoming,
                }
            }
        };
    }

    pub fn finish(self) -> Vec<ConflictRegion> {
        if let Some(opened_at) = self.state.opened_at() {
            log::debug!(
                "discarding conflict opened at line {}: no footer before end of input",
                opened_at + 1
            );
        }
        self.out
    }

    fn open(c: &LineClass) -> ScanState {
        ScanState::InCurrent {
            header: MarkerLine::from_class(c),
            current: OpenSection::after(c),
        }
    }

    fn skip(state: &ScanState, at: &LineClass, reason: &str) {
        if let Some(opened_at) = state.opened_at() {
            log::debug!(
                "discarding conflict opened at line {}: {reason} at line {}",
                opened_at + 1,
                at.index + 1
            );
        }
    }
}

impl Default for ConflictBuilder {
    fn default() -> Self {
        Self::new()
    }
}
