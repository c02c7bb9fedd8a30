//! Pooled conflict parsing shared by every caller that needs regions.
//!
//! The tracker owns one [`VersionedCache`] of parse results keyed by
//! document path. Callers obtain a [`TrackerHandle`] tagged with an origin
//! name; handles share the pool, so two features asking about the same
//! document version get the same parse.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::cache::VersionedCache;
use crate::document::Document;
use crate::parsing::{ConflictRegion, parse_conflicts};

pub type Conflicts = Rc<[ConflictRegion]>;

#[derive(Debug, Default, Clone)]
pub struct ConflictTracker {
    cache: Rc<RefCell<VersionedCache<PathBuf, Conflicts>>>,
}

impl ConflictTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that reads through the shared pool and logs as `origin`.
    pub fn create_tracker(&self, origin: &str) -> TrackerHandle {
        TrackerHandle {
            origin: origin.to_string(),
            tracker: self.clone(),
        }
    }

    /// Regions for the document's current version, parsing on a miss.
    pub fn get_conflicts(&self, document: &Document) -> Conflicts {
        self.lookup("tracker", document)
    }

    /// Drop any cached parse for `path`.
    pub fn forget(&self, path: &Path) -> bool {
        self.cache.borrow_mut().invalidate(path)
    }

    fn lookup(&self, origin: &str, document: &Document) -> Conflicts {
        let path = document.path();
        let version = document.version();

        if let Some(hit) = self.cache.borrow().get(path, version) {
            log::debug!("[{origin}] cache hit for {} v{version}", path.display());
            return Rc::clone(hit);
        }

        let regions: Conflicts = parse_conflicts(document.rope()).into();
        log::debug!(
            "[{origin}] parsed {} v{version}: {} conflict(s)",
            path.display(),
            regions.len()
        );
        self.cache
            .borrow_mut()
            .insert(path.to_path_buf(), version, Rc::clone(&regions));
        regions
    }
}

/// A named view onto a [`ConflictTracker`].
#[derive(Debug, Clone)]
pub struct TrackerHandle {
    origin: String,
    tracker: ConflictTracker,
}

impl TrackerHandle {
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn get_conflicts(&self, document: &Document) -> Conflicts {
        self.tracker.lookup(&self.origin, document)
    }

    pub fn conflict_count(&self, document: &Document) -> usize {
        self.get_conflicts(document).len()
    }

    pub fn forget(&self, document: &Document) {
        if self.tracker.forget(document.path()) {
            log::debug!("[{}] forgot {}", self.origin, document.path().display());
        }
    }
}
