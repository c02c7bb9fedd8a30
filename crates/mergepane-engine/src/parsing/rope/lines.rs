use xi_rope::Rope;

use super::span::Span;

/// A reference to a single line in the rope with its number and byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// 0-based line number.
    pub index: usize,
    /// Byte span of this line in the rope (includes the line break if present).
    pub span: Span,
    /// The line text, line break included.
    pub text: String,
}

impl LineRef {
    /// Line text with any trailing `\r\n` / `\n` removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim_end_matches(['\r', '\n'])
    }

    /// Byte offset of the end of the line's content, before its line break.
    pub fn content_end(&self) -> usize {
        self.span.start + self.trimmed().len()
    }
}

/// Returns an iterator over lines with their numbers and byte spans.
///
/// Uses `lines_raw` to preserve line break characters, so consecutive spans
/// tile the rope exactly.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).enumerate().map(move |(index, line)| {
        let start = offset;
        offset += line.len();
        LineRef {
            index,
            span: Span { start, end: offset },
            text: line.into_owned(),
        }
    })
}
