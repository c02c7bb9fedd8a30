//! The three-pane comparison: current projection, live merged document,
//! incoming projection.
//!
//! A `MergeSession` is owned by whoever opens the comparison and is passed
//! explicitly to every accept and navigation call. Accepts take the session
//! and the document source by `&mut`, so commits against one document are
//! serialised by the borrow checker.

use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{NavigateError, ResolveError, SessionError, SourceError};
use crate::navigation::{Direction, find_for_navigation};
use crate::parsing::{ConflictRegion, Side};
use crate::patch::Patch;
use crate::projection::{VirtualDocumentId, reconstruct};
use crate::resolution::{AcceptDecision, commit_in_source, decision_at_cursor};
use crate::source::DocumentSource;
use crate::tracker::{Conflicts, TrackerHandle};

/// A read-only projection view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    pub id: VirtualDocumentId,
    pub text: String,
}

impl Pane {
    fn build(document: &Document, regions: &[ConflictRegion], side: Side) -> Self {
        Self {
            id: VirtualDocumentId::new(document.path(), side, regions),
            text: reconstruct(document, regions, side),
        }
    }
}

#[derive(Debug)]
pub struct MergeSession {
    path: PathBuf,
    tracker: TrackerHandle,
    current: Pane,
    incoming: Pane,
}

impl MergeSession {
    /// Open the comparison for `path`. Fails when the file has no conflicts.
    pub fn open<S: DocumentSource + ?Sized>(
        source: &mut S,
        tracker: TrackerHandle,
        path: &Path,
    ) -> Result<Self, SessionError> {
        let document = source.open_document(path)?;
        let regions = tracker.get_conflicts(document);
        if regions.is_empty() {
            return Err(SessionError::NoConflicts(path.to_path_buf()));
        }
        log::debug!(
            "[{}] session for {} with {} conflict(s)",
            tracker.origin(),
            path.display(),
            regions.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            current: Pane::build(document, &regions, Side::Current),
            incoming: Pane::build(document, &regions, Side::Incoming),
            tracker,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pane(&self, side: Side) -> &Pane {
        match side {
            Side::Current => &self.current,
            Side::Incoming => &self.incoming,
        }
    }

    /// Regions of the merged document as it stands now.
    pub fn conflicts<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<Conflicts, SourceError> {
        Ok(self.tracker.get_conflicts(self.document(source)?))
    }

    /// Rebuild both panes from a fresh parse.
    pub fn refresh<S: DocumentSource + ?Sized>(&mut self, source: &S) -> Result<(), SourceError> {
        let document = self.document(source)?;
        let regions = self.tracker.get_conflicts(document);
        self.current = Pane::build(document, &regions, Side::Current);
        self.incoming = Pane::build(document, &regions, Side::Incoming);
        Ok(())
    }

    /// Accept `side` of `conflict`, then refresh the panes.
    pub fn accept<S: DocumentSource + ?Sized>(
        &mut self,
        source: &mut S,
        conflict: &ConflictRegion,
        side: Side,
    ) -> Result<Patch, ResolveError> {
        let patch = commit_in_source(source, &self.path, &AcceptDecision::new(conflict, side))?;
        self.after_commit(&*source)?;
        Ok(patch)
    }

    /// Accept whichever side the cursor on `line` points at.
    pub fn accept_at_cursor<S: DocumentSource + ?Sized>(
        &mut self,
        source: &mut S,
        line: usize,
    ) -> Result<(Side, Patch), ResolveError> {
        let regions = self.conflicts(&*source)?;
        let decision = decision_at_cursor(&regions, line)?;
        let side = decision.side;

        // The commit changes the version in a way no caller can predict.
        self.tracker.forget(self.document(&*source)?);
        let patch = commit_in_source(source, &self.path, &decision)?;
        self.after_commit(&*source)?;
        Ok((side, patch))
    }

    /// Accept `side` of every conflict. Returns how many were resolved.
    ///
    /// A failed commit stops the run, but the panes are still rebuilt from
    /// whatever the earlier commits left behind before the error returns.
    pub fn accept_all<S: DocumentSource + ?Sized>(
        &mut self,
        source: &mut S,
        side: Side,
    ) -> Result<usize, ResolveError> {
        let regions = self.conflicts(&*source)?;
        // Last to first, so earlier regions keep their recorded lines.
        let committed = regions.iter().rev().try_for_each(|conflict| {
            let decision = AcceptDecision::new(conflict, side);
            commit_in_source(&mut *source, &self.path, &decision).map(drop)
        });
        self.after_commit(&*source)?;
        committed?;
        Ok(regions.len())
    }

    /// The region to move to from the cursor on `line`.
    pub fn navigate<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        line: usize,
        direction: Direction,
    ) -> Result<ConflictRegion, NavigateError> {
        let regions = self.conflicts(source)?;
        find_for_navigation(line, &regions, direction).cloned()
    }

    fn after_commit<S: DocumentSource + ?Sized>(&mut self, source: &S) -> Result<(), SourceError> {
        self.tracker.forget(self.document(source)?);
        self.refresh(source)
    }

    fn document<'s, S: DocumentSource + ?Sized>(
        &self,
        source: &'s S,
    ) -> Result<&'s Document, SourceError> {
        source
            .document(&self.path)
            .ok_or_else(|| SourceError::NotOpen(self.path.clone()))
    }
}
