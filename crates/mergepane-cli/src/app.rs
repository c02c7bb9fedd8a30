use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mergepane_config::Config;
use mergepane_engine::{
    ConflictTracker, Conflicts, Direction, Document, DocumentSource, MergeSession, NavigateError,
    ResolveError, Side, Workspace, find_containing,
};

/// Interactive state: the open document, its session and the cursor.
pub struct App {
    pub config: Config,
    workspace: Workspace,
    session: MergeSession,
    /// Cursor line in the merged document, 0-based.
    pub cursor: usize,
    /// First visible line of the merged pane, and of every pane when synced.
    pub scroll: usize,
    /// First visible line of the side panes when `sync_scroll` is off.
    side_scroll: usize,
    pub status: Option<String>,
    pub dirty: bool,
}

impl App {
    pub fn open(path: &Path, config: Config) -> Result<Self> {
        let mut workspace = Workspace::new();
        let tracker = ConflictTracker::new();
        let session = MergeSession::open(&mut workspace, tracker.create_tracker("commands"), path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(Self::with_session(workspace, session, config))
    }

    pub fn with_session(workspace: Workspace, session: MergeSession, config: Config) -> Self {
        let mut app = Self {
            config,
            workspace,
            session,
            cursor: 0,
            scroll: 0,
            side_scroll: 0,
            status: None,
            dirty: false,
        };
        if let Ok(first) = app.session.navigate(&app.workspace, 0, Direction::Forwards) {
            app.cursor = first.range.start;
        }
        app
    }

    pub fn path(&self) -> &Path {
        self.session.path()
    }

    pub fn document(&self) -> Option<&Document> {
        self.workspace.document(self.session.path())
    }

    pub fn merged_text(&self) -> String {
        self.document().map(Document::text).unwrap_or_default()
    }

    pub fn line_count(&self) -> usize {
        self.document().map_or(1, Document::line_count)
    }

    pub fn pane_text(&self, side: Side) -> &str {
        &self.session.pane(side).text
    }

    pub fn conflicts(&self) -> Conflicts {
        self.session
            .conflicts(&self.workspace)
            .unwrap_or_else(|_| Vec::new().into())
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let last = self.line_count().saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    pub fn navigate(&mut self, direction: Direction) {
        match self.session.navigate(&self.workspace, self.cursor, direction) {
            Ok(region) => {
                self.cursor = region.range.start;
                self.status = None;
            }
            Err(NavigateError::NoConflicts) if self.config.auto_navigate_next => {}
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// Accept `side` of the conflict under the cursor.
    pub fn accept(&mut self, side: Side) {
        let conflicts = self.conflicts();
        let Some(conflict) = find_containing(self.cursor, &conflicts).cloned() else {
            self.status = Some(ResolveError::NoConflictAtCursor { line: self.cursor }.to_string());
            return;
        };
        let result = self.session.accept(&mut self.workspace, &conflict, side);
        self.after_accept(result.map(|_| side), conflict.range.start);
    }

    /// Accept whichever side the cursor sits in.
    pub fn accept_selection(&mut self) {
        let start = find_containing(self.cursor, &self.conflicts()).map(|c| c.range.start);
        let result = self
            .session
            .accept_at_cursor(&mut self.workspace, self.cursor)
            .map(|(side, _)| side);
        self.after_accept(result, start.unwrap_or(self.cursor));
    }

    fn after_accept(&mut self, result: Result<Side, ResolveError>, start: usize) {
        match result {
            Ok(side) => {
                self.dirty = true;
                self.cursor = start.min(self.line_count().saturating_sub(1));
                let remaining = self.conflicts().len();
                self.status = Some(if remaining == 0 {
                    "All conflicts resolved, press s to save".to_string()
                } else {
                    format!("Accepted {side} change, {remaining} conflict(s) left")
                });
            }
            Err(e) => {
                log::warn!("accept failed: {e}");
                self.status = Some(e.to_string());
            }
        }
    }

    pub fn save(&mut self) {
        let path: PathBuf = self.path().to_path_buf();
        match self.workspace.save(&path) {
            Ok(()) => {
                self.dirty = false;
                self.status = Some(format!("Saved {}", path.display()));
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// First visible line of the current and incoming panes.
    pub fn side_scroll(&self) -> usize {
        if self.config.sync_scroll {
            self.scroll
        } else {
            self.side_scroll
        }
    }

    /// Scroll the side panes on their own. Synced panes follow the cursor
    /// instead, so this only applies with `sync_scroll` off.
    pub fn scroll_sides(&mut self, delta: isize) {
        if self.config.sync_scroll {
            return;
        }
        let last = self.line_count().saturating_sub(1) + self.config.leading_padding;
        self.side_scroll = self.side_scroll.saturating_add_signed(delta).min(last);
    }

    /// Keep the cursor inside a viewport of `height` lines.
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + height {
            self.scroll = self.cursor + 1 - height;
        }
    }
}
