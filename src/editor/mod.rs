//! The editor session: the single owning object the host drives.
//!
//! Owns the workspace, the live buffer for the active file, the cursor, the
//! suggestion popup, the pending completion/save deadlines, and the
//! synchronizer. Single-threaded and event-driven: the host feeds it keys,
//! navigation, and periodic ticks; nothing here blocks.

mod input;

use crate::buffer::CodeBuffer;
use crate::completion::CompletionEngine;
use crate::config::EditorConfig;
use crate::sync::{ProjectStore, Synchronizer};
use crate::syntax;
use crate::types::{Cursor, FileKind, Suggestion};
use crate::workspace::Workspace;
use anyhow::Result;
use std::time::Instant;

/// The suggestion popup: either closed, or open over a non-empty list with a
/// selected index.
enum Popup {
    Closed,
    Open { suggestions: Vec<Suggestion>, selected: usize },
}

/// A completion request waiting out its debounce window. `offset` is the
/// cursor position captured at schedule time; if the cursor has moved by the
/// time the deadline fires, the request is stale and is discarded.
struct PendingCompletion {
    deadline: Instant,
    offset: usize,
}

/// One editing session over one project.
pub struct EditorSession {
    workspace: Workspace,
    code: CodeBuffer,
    current_file: String,
    cursor: usize,
    loading: bool,
    popup: Popup,
    pending_completion: Option<PendingCompletion>,
    engine: CompletionEngine,
    sync: Synchronizer,
    config: EditorConfig,
}

impl EditorSession {
    /// Create a session against a store. Call [`EditorSession::load_project`]
    /// next to populate the workspace.
    pub fn new(store: Box<dyn ProjectStore>, project_id: impl Into<String>, config: EditorConfig) -> Self {
        let engine = CompletionEngine::new(config.max_suggestions);
        let sync = Synchronizer::new(store, project_id, config.save_quiet());
        Self {
            workspace: Workspace::new(),
            code: CodeBuffer::new(),
            current_file: String::new(),
            cursor: 0,
            loading: false,
            popup: Popup::Closed,
            pending_completion: None,
            engine,
            sync,
            config,
        }
    }

    // ==================== accessors ====================

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_completion_enabled(&mut self, enabled: bool) {
        self.config.completion_enabled = enabled;
        if !enabled {
            self.popup = Popup::Closed;
            self.pending_completion = None;
        }
    }

    pub fn current_file(&self) -> &str {
        &self.current_file
    }

    /// The live, possibly not-yet-persisted text of the active file.
    pub fn code(&self) -> String {
        self.code.to_string()
    }

    pub fn cursor_offset(&self) -> usize {
        self.cursor
    }

    pub fn cursor_position(&self) -> Cursor {
        self.code.cursor_at(self.cursor)
    }

    /// True between a file switch and the host's load acknowledgment.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn popup_open(&self) -> bool {
        matches!(self.popup, Popup::Open { .. })
    }

    /// The current suggestion list (empty while the popup is closed).
    pub fn suggestions(&self) -> &[Suggestion] {
        match &self.popup {
            Popup::Open { suggestions, .. } => suggestions,
            Popup::Closed => &[],
        }
    }

    pub fn selected_suggestion(&self) -> Option<usize> {
        match &self.popup {
            Popup::Open { selected, .. } => Some(*selected),
            Popup::Closed => None,
        }
    }

    /// Whether the active file accepts edits.
    pub fn active_editable(&self) -> bool {
        self.workspace.get(&self.current_file).is_none_or(|d| !d.read_only())
    }

    fn active_is_source(&self) -> bool {
        self.workspace
            .get(&self.current_file)
            .is_none_or(|d| d.kind() == FileKind::Source)
    }

    // ==================== project lifecycle ====================

    /// Fetch the project's files and open the first source file. An empty
    /// project gets a fresh default source file.
    pub fn load_project(&mut self) -> Result<()> {
        let files = self.sync.list_files()?;
        self.workspace.load_from_store(&files);
        log::info!("loaded {} files from project {}", files.len(), self.sync.project_id());
        if self.workspace.is_empty() {
            let content = default_content("project.move");
            let full = self.workspace.add_file("project.move", &content)?;
            self.sync.flush(&full, &content);
        }
        let first = self.first_open_candidate();
        self.set_current_file(&first);
        Ok(())
    }

    /// Re-fetch the file list and replace workspace contents, then reload the
    /// active file under the loading state.
    pub fn sync_from_remote(&mut self) -> Result<()> {
        let files = self.sync.list_files()?;
        self.sync.cancel();
        self.pending_completion = None;
        self.popup = Popup::Closed;
        self.workspace.load_from_store(&files);
        let name = if self.workspace.contains(&self.current_file) {
            self.current_file.clone()
        } else {
            self.first_open_candidate()
        };
        self.current_file = name.clone();
        self.code = CodeBuffer::from_str(self.workspace.content(&name).unwrap_or(""));
        self.cursor = 0;
        self.loading = true;
        Ok(())
    }

    /// The first source file by name, or failing that the first file at all.
    fn first_open_candidate(&self) -> String {
        let names = self.workspace.names();
        names
            .iter()
            .find(|n| self.workspace.get(n).is_some_and(|d| d.kind() == FileKind::Source))
            .or_else(|| names.first())
            .cloned()
            .unwrap_or_default()
    }

    // ==================== file switching ====================

    /// Switch the active file. Switching to the already-active file is a
    /// no-op: no store writes, no reload.
    ///
    /// The order here prevents data loss: the pending save is canceled, the
    /// previous file's settled content is flushed synchronously, and only
    /// then is the new content loaded. The loading state stays set until the
    /// host acknowledges with [`EditorSession::ack_file_loaded`].
    pub fn set_current_file(&mut self, name: &str) {
        if name == self.current_file {
            return;
        }
        self.sync.cancel();
        self.pending_completion = None;
        self.popup = Popup::Closed;

        let prev = std::mem::replace(&mut self.current_file, name.to_string());
        let flushable = self
            .workspace
            .get(&prev)
            .filter(|d| !d.read_only())
            .map(|d| d.content().to_string());
        if let Some(content) = flushable {
            self.sync.flush(&prev, &content);
        }

        self.code = CodeBuffer::from_str(self.workspace.content(name).unwrap_or(""));
        self.cursor = 0;
        self.loading = true;
    }

    /// The host calls this once it has re-rendered from the freshly loaded
    /// content; until then, content changes are ignored rather than treated
    /// as user edits.
    pub fn ack_file_loaded(&mut self) {
        self.loading = false;
    }

    // ==================== file management ====================

    /// Create a file (bare names land under `sources/`), persist it, and
    /// switch to it. `.move` files start with a comment header.
    pub fn create_file(&mut self, name: &str) -> Result<String> {
        let content = default_content(name.trim());
        let full = self.workspace.add_file(name, &content)?;
        self.sync.flush(&full, &content);
        self.set_current_file(&full);
        Ok(full)
    }

    /// Delete a file locally and remotely. Deleting the active file switches
    /// to the first remaining file.
    pub fn delete_file(&mut self, name: &str) -> Result<()> {
        self.workspace.delete_file(name)?;
        if self.sync.pending_file() == Some(name) {
            self.sync.cancel();
        }
        self.sync.delete(name);
        if self.current_file == name {
            let next = self.first_open_candidate();
            self.set_current_file(&next);
        }
        Ok(())
    }

    /// Rename a file: delete+create in the workspace and the store. Renaming
    /// the active file retargets the active name without reloading; the
    /// content is identical by construction.
    pub fn rename_file(&mut self, old: &str, new: &str) -> Result<String> {
        let new_full = self.workspace.rename_file(old, new)?;
        if new_full == old {
            return Ok(new_full);
        }
        if self.sync.pending_file() == Some(old) {
            self.sync.cancel();
        }
        self.sync.delete(old);
        let content = self.workspace.content(&new_full).unwrap_or("").to_string();
        self.sync.flush(&new_full, &content);
        if self.current_file == old {
            self.current_file = new_full.clone();
        }
        Ok(new_full)
    }

    // ==================== text changes ====================

    /// Replace the whole live text (textarea semantics). Ignored while
    /// loading and for read-only files.
    pub fn set_code(&mut self, text: &str) {
        self.set_code_at(text, Instant::now());
    }

    pub fn set_code_at(&mut self, text: &str, now: Instant) {
        if self.loading || !self.active_editable() {
            return;
        }
        self.code = CodeBuffer::from_str(text);
        self.cursor = self.code.clamp(self.cursor);
        self.register_change(now);
    }

    /// Move the cursor. Any movement closes the popup and invalidates a
    /// scheduled completion request.
    pub fn set_cursor(&mut self, offset: usize) {
        let clamped = self.code.clamp(offset);
        if clamped != self.cursor {
            self.cursor = clamped;
            self.cursor_moved();
        }
    }

    fn cursor_moved(&mut self) {
        self.popup = Popup::Closed;
        self.pending_completion = None;
    }

    /// After an edit settles: mirror the live text into the workspace and
    /// schedule a debounced save.
    fn register_change(&mut self, now: Instant) {
        let name = self.current_file.clone();
        let text = self.code.to_string();
        if self.workspace.content(&name) == Some(text.as_str()) {
            return;
        }
        if self.workspace.update_file(&name, &text).is_err() {
            return;
        }
        self.sync.schedule(&name, now);
    }

    // ==================== timers ====================

    /// Fire any deadlines that have fallen due.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if let Some(req) = self.pending_completion.take() {
            if now < req.deadline {
                self.pending_completion = Some(req);
            } else if req.offset == self.cursor {
                let text = self.code.to_string();
                let position = self.code.cursor_at(self.cursor);
                let suggestions = self.engine.suggest(&text, position);
                self.popup = if suggestions.is_empty() {
                    Popup::Closed
                } else {
                    Popup::Open { suggestions, selected: 0 }
                };
            } else {
                // Stale: the cursor moved since the request was scheduled.
                self.popup = Popup::Closed;
            }
        }

        if let Some(name) = self.sync.take_due(now) {
            if let Some(content) = self.workspace.content(&name).map(str::to_string) {
                self.sync.flush(&name, &content);
            }
        }
    }

    // ==================== rendering ====================

    /// The active file rendered as per-line HTML. Source files are
    /// syntax-highlighted; other kinds are escaped verbatim.
    pub fn highlighted_html(&self) -> Vec<String> {
        let text = self.code.to_string();
        let highlight = self.active_is_source();
        text.split('\n')
            .map(|line| {
                if highlight {
                    syntax::render_html(line)
                } else {
                    syntax::escape_html(line)
                }
            })
            .collect()
    }
}

/// Default content for a newly created file.
fn default_content(name: &str) -> String {
    if name.ends_with(".move") {
        format!("// {name}\n\n")
    } else {
        String::new()
    }
}
