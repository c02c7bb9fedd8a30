use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use xi_rope::{Delta, Rope, RopeInfo};

use crate::error::SourceError;
use crate::parsing::rope::{LineRange, Span, slice::slice_to_string};
use crate::patch::Patch;

/// An open text document: a path, an xi-rope buffer and a version counter.
///
/// The buffer is the single source of truth. Every edit goes through
/// [`Document::replace_lines`], which applies one `Delta` and takes a new
/// version. Versions are unique across every document in the process, so
/// `(path, version)` identifies a content state exactly, even after a
/// document is replaced or reloaded from disk.
#[derive(Clone)]
pub struct Document {
    path: PathBuf,
    buffer: Rope,
    /// Byte offset of the start of every line; always starts with 0.
    line_starts: Vec<usize>,
    version: u64,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: &str) -> Self {
        let buffer = Rope::from(text);
        let line_starts = compute_line_starts(&buffer);
        Self {
            path: path.into(),
            buffer,
            line_starts,
            version: next_version(),
        }
    }

    /// Create a document from raw bytes, rejecting invalid UTF-8.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self, SourceError> {
        let path = path.into();
        let text = std::str::from_utf8(bytes).map_err(|source| SourceError::InvalidUtf8 {
            path: path.clone(),
            source,
        })?;
        Ok(Self::new(path, text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn rope(&self) -> &Rope {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Number of lines as an editor counts them: line breaks plus one.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte span of a line, line break included.
    pub fn line_span(&self, line: usize) -> Option<Span> {
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.buffer.len());
        Some(Span { start, end })
    }

    /// Text of a line, line break included.
    pub fn line_text(&self, line: usize) -> Option<String> {
        self.line_span(line).map(|sp| self.slice(sp))
    }

    /// The line break ending `line`: `"\r\n"`, `"\n"`, or `""` for the last line.
    pub fn line_break(&self, line: usize) -> &'static str {
        match self.line_text(line) {
            Some(t) if t.ends_with("\r\n") => "\r\n",
            Some(t) if t.ends_with('\n') => "\n",
            _ => "",
        }
    }

    /// Byte span covering a range of lines. Out-of-range lines clamp to the
    /// end of the document.
    pub fn lines_span(&self, lines: LineRange) -> Span {
        let offset = |line: usize| {
            self.line_starts
                .get(line)
                .copied()
                .unwrap_or(self.buffer.len())
        };
        let start = offset(lines.start);
        Span {
            start,
            end: offset(lines.end).max(start),
        }
    }

    /// Text of a range of lines, line breaks included.
    pub fn text_in_lines(&self, lines: LineRange) -> String {
        self.slice(self.lines_span(lines))
    }

    pub fn slice(&self, span: Span) -> String {
        slice_to_string(&self.buffer, span)
    }

    /// Replace a range of lines with `replacement` as one atomic edit.
    ///
    /// Fails without touching the buffer when the range starts past the end
    /// of the document.
    pub fn replace_lines(
        &mut self,
        lines: LineRange,
        replacement: &str,
    ) -> Result<Patch, SourceError> {
        if lines.start >= self.line_count() || lines.end > self.line_count() {
            return Err(SourceError::LineOutOfRange {
                path: self.path.clone(),
                lines,
                line_count: self.line_count(),
            });
        }
        Ok(self.replace_span(self.lines_span(lines), replacement))
    }

    fn replace_span(&mut self, span: Span, replacement: &str) -> Patch {
        let delta: Delta<RopeInfo> =
            Delta::simple_edit(span.start..span.end, Rope::from(replacement), self.buffer.len());
        self.buffer = delta.apply(&self.buffer);
        self.line_starts = compute_line_starts(&self.buffer);
        self.version = next_version();

        log::debug!(
            "{} v{}: replaced bytes {}..{} with {} bytes",
            self.path.display(),
            self.version,
            span.start,
            span.end,
            replacement.len()
        );

        Patch {
            changed: vec![span.start..span.start + replacement.len()],
            version: self.version,
        }
    }
}

/// Every document state gets a version no other state in the process has.
fn next_version() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

fn compute_line_starts(buffer: &Rope) -> Vec<usize> {
    let mut starts = vec![0];
    let mut offset = 0;
    for line in buffer.lines_raw(..) {
        offset += line.len();
        if line.ends_with('\n') {
            starts.push(offset);
        }
    }
    starts
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("version", &self.version)
            .field("len", &self.buffer.len())
            .field("line_count", &self.line_count())
            .finish()
    }
}
