/// Result of applying an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Byte ranges of inserted text, in post-edit offsets
    pub changed: Vec<std::ops::Range<usize>>,
    /// Document version after the edit
    pub version: u64,
}
