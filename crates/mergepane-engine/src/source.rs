//! The document-source collaborator: opening documents, reading line ranges
//! and applying version-checked edits.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::SourceError;
use crate::parsing::rope::LineRange;
use crate::patch::Patch;

/// Where documents come from and where edits go.
///
/// Every call is a single-shot operation that completes before the core
/// proceeds; no two edits against one document are ever in flight.
pub trait DocumentSource {
    /// Open a document, loading it on first use.
    fn open_document(&mut self, path: &Path) -> Result<&Document, SourceError>;

    /// An already-open document.
    fn document(&self, path: &Path) -> Option<&Document>;

    /// Text of a range of lines in an open document.
    fn get_text(&self, path: &Path, lines: LineRange) -> Result<String, SourceError> {
        let doc = self
            .document(path)
            .ok_or_else(|| SourceError::NotOpen(path.to_path_buf()))?;
        Ok(doc.text_in_lines(lines))
    }

    /// Replace `lines` with `replacement`, failing if the document is no
    /// longer at `expected_version`.
    fn apply_edit(
        &mut self,
        path: &Path,
        expected_version: u64,
        lines: LineRange,
        replacement: &str,
    ) -> Result<Patch, SourceError>;
}

/// Open documents keyed by path, loaded from and saved to the filesystem.
#[derive(Debug, Default)]
pub struct Workspace {
    documents: HashMap<PathBuf, Document>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an in-memory document, replacing any open one at its path.
    pub fn insert(&mut self, document: Document) {
        self.documents
            .insert(document.path().to_path_buf(), document);
    }

    /// Drop an open document without saving it.
    pub fn close(&mut self, path: &Path) -> Option<Document> {
        self.documents.remove(path)
    }

    /// Write an open document back to its path.
    pub fn save(&self, path: &Path) -> Result<(), SourceError> {
        let doc = self
            .documents
            .get(path)
            .ok_or_else(|| SourceError::NotOpen(path.to_path_buf()))?;
        write_file(path, &doc.text())
    }
}

impl DocumentSource for Workspace {
    fn open_document(&mut self, path: &Path) -> Result<&Document, SourceError> {
        if !self.documents.contains_key(path) {
            let bytes = read_file(path)?;
            let document = Document::from_bytes(path, &bytes)?;
            log::debug!("opened {} ({} lines)", path.display(), document.line_count());
            self.documents.insert(path.to_path_buf(), document);
        }
        self.documents
            .get(path)
            .ok_or_else(|| SourceError::NotOpen(path.to_path_buf()))
    }

    fn document(&self, path: &Path) -> Option<&Document> {
        self.documents.get(path)
    }

    fn apply_edit(
        &mut self,
        path: &Path,
        expected_version: u64,
        lines: LineRange,
        replacement: &str,
    ) -> Result<Patch, SourceError> {
        let doc = self
            .documents
            .get_mut(path)
            .ok_or_else(|| SourceError::NotOpen(path.to_path_buf()))?;
        if doc.version() != expected_version {
            return Err(SourceError::VersionMismatch {
                path: path.to_path_buf(),
                expected: expected_version,
                actual: doc.version(),
            });
        }
        doc.replace_lines(lines, replacement)
    }
}

/// Read a file's raw bytes
fn read_file(path: &Path) -> Result<Vec<u8>, SourceError> {
    if !path.exists() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }
    fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write content to a file, creating parent directories if needed
fn write_file(path: &Path, content: &str) -> Result<(), SourceError> {
    let io_err = |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_open_document_reads_from_disk_once() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(&dir, "a.txt", "one\ntwo\n");
        let mut ws = Workspace::new();

        assert_eq!(ws.open_document(&path).unwrap().text(), "one\ntwo\n");

        // Later disk changes are not picked up while the document is open.
        fs::write(&path, "changed\n").unwrap();
        assert_eq!(ws.open_document(&path).unwrap().text(), "one\ntwo\n");
    }

    #[test]
    fn test_open_document_not_found() {
        let dir = TempDir::new().unwrap();
        let mut ws = Workspace::new();
        let result = ws.open_document(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[test]
    fn test_open_document_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bin.dat");
        fs::write(&path, [0xc3, 0x28]).unwrap();
        let mut ws = Workspace::new();
        assert!(matches!(
            ws.open_document(&path),
            Err(SourceError::InvalidUtf8 { .. })
        ));
    }

    #[test]
    fn test_get_text_requires_open_document() {
        let ws = Workspace::new();
        let result = ws.get_text(Path::new("nope.txt"), LineRange::line(0));
        assert!(matches!(result, Err(SourceError::NotOpen(_))));
    }

    #[test]
    fn test_apply_edit_checks_version() {
        let mut ws = Workspace::new();
        ws.insert(Document::new("mem.txt", "a\nb\n"));
        let path = Path::new("mem.txt");
        let opened = ws.document(path).unwrap().version();

        let patch = ws.apply_edit(path, opened, LineRange::line(0), "z\n").unwrap();
        assert_eq!(ws.get_text(path, LineRange::new(0, 2)).unwrap(), "z\nb\n");

        let stale = ws.apply_edit(path, opened, LineRange::line(1), "y\n");
        let Err(SourceError::VersionMismatch {
            expected, actual, ..
        }) = stale
        else {
            panic!("expected a version mismatch, got {stale:?}");
        };
        assert_eq!((expected, actual), (opened, patch.version));
        assert_eq!(ws.document(path).unwrap().text(), "z\nb\n");
    }

    #[test]
    fn test_save_writes_and_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/out.txt");
        let mut ws = Workspace::new();
        ws.insert(Document::new(&path, "saved\n"));

        ws.save(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "saved\n");
    }

    #[test]
    fn test_close_forgets_document() {
        let mut ws = Workspace::new();
        ws.insert(Document::new("mem.txt", "x"));
        assert!(ws.close(Path::new("mem.txt")).is_some());
        assert!(ws.document(Path::new("mem.txt")).is_none());
    }
}
