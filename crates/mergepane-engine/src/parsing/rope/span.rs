use serde::{Deserialize, Serialize};

/// A byte range `[start, end)` into the rope.
///
/// Sections and regions store spans rather than copied text, so slicing the
/// rope with any span reproduces the exact source, line breaks included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// A half-open range of 0-based line numbers `[start, end)`.
///
/// A single marker line `n` is `LineRange { start: n, end: n + 1 }`; a
/// section with no content lines has `start == end`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The range covering exactly one line.
    pub fn line(line: usize) -> Self {
        Self {
            start: line,
            end: line + 1,
        }
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Whether `line` falls inside this range.
    pub fn contains(self, line: usize) -> bool {
        self.start <= line && line < self.end
    }

    /// The last line of a non-empty range.
    pub fn last(self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }
}
