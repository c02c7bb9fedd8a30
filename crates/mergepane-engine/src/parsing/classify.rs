use crate::markers::{ConflictMarker, MarkerKind};
use crate::parsing::rope::{lines::LineRef, span::Span};

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of conflict parsing: each line is classified
/// independently, without reference to the surrounding conflict state.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// 0-based line number.
    pub index: usize,
    /// Full byte span of this line, line break included.
    pub line: Span,
    /// Byte offset where the line's text ends, before the line break.
    pub content_end: usize,
    /// The marker this line starts with, if any.
    pub marker: Option<MarkerKind>,
    /// Label text following the marker.
    pub label: Option<String>,
}

/// Classifies individual lines for the conflict state machine.
pub struct MarkerLineClassifier;

impl MarkerLineClassifier {
    pub fn classify(&self, lr: &LineRef) -> LineClass {
        let marker = ConflictMarker::sig(&lr.text);
        let label = marker
            .and_then(|kind| ConflictMarker::label(&lr.text, kind))
            .map(str::to_string);

        LineClass {
            index: lr.index,
            line: lr.span,
            content_end: lr.content_end(),
            marker,
            label,
        }
    }
}
