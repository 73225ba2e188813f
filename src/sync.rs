//! Persistence: debounced writes of workspace content to a project store.
//!
//! The synchronizer never owns document content. It holds at most one
//! pending-save deadline at a time; the session asks it at tick time which
//! file is due and hands over the workspace's current content for that file.
//! A failed write is logged and dropped; the in-memory workspace stays the
//! source of truth until the next successful write.

use crate::types::FileKind;
use crate::workspace::kind_for;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A file record as the project store sees it: base name, directory path,
/// and kind, plus the full content (writes are whole-file upserts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub name: String,
    pub content: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
}

/// Split a workspace file name into the store's `(name, path, kind)` triple.
///
/// `Move.toml` lives at the project root; pathed names split at the last
/// separator; bare names default to `sources/`.
pub fn storage_location(name: &str) -> (String, String, FileKind) {
    if name == "Move.toml" {
        return (name.to_string(), String::new(), FileKind::Config);
    }
    match name.rsplit_once('/') {
        Some((path, base)) => (base.to_string(), path.to_string(), kind_for(name)),
        None => (name.to_string(), "sources".to_string(), FileKind::Source),
    }
}

/// The remote project store, as the core consumes it. The host supplies the
/// real implementation (an HTTP client in the IDE); [`MemoryStore`] is the
/// in-process one.
pub trait ProjectStore {
    fn list_files(&mut self, project_id: &str) -> Result<Vec<StoredFile>>;
    fn upsert_file(&mut self, project_id: &str, file: &StoredFile) -> Result<()>;
    fn delete_file(&mut self, project_id: &str, name: &str) -> Result<()>;
}

/// A pending debounced save: which file, and when it falls due.
struct PendingSave {
    name: String,
    deadline: Instant,
}

/// Schedules and performs store writes for one project.
pub struct Synchronizer {
    store: Box<dyn ProjectStore>,
    project_id: String,
    quiet_period: Duration,
    pending: Option<PendingSave>,
}

impl Synchronizer {
    pub fn new(store: Box<dyn ProjectStore>, project_id: impl Into<String>, quiet_period: Duration) -> Self {
        Self { store, project_id: project_id.into(), quiet_period, pending: None }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Schedule a write for `name` one quiet period after `now`, replacing
    /// any previously pending write.
    pub fn schedule(&mut self, name: &str, now: Instant) {
        self.pending = Some(PendingSave { name: name.to_string(), deadline: now + self.quiet_period });
    }

    /// Drop any pending write. Idempotent.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// The file a write is pending for, if any.
    pub fn pending_file(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.name.as_str())
    }

    /// If the pending write has fallen due, take it. The caller then calls
    /// [`Synchronizer::flush`] with the file's current content.
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        if self.pending.as_ref().is_some_and(|p| now >= p.deadline) {
            return self.pending.take().map(|p| p.name);
        }
        None
    }

    /// Write one file's full content to the store immediately. Failures are
    /// logged and swallowed; no retry is attempted.
    pub fn flush(&mut self, name: &str, content: &str) {
        let (base, path, kind) = storage_location(name);
        let file = StoredFile { name: base, content: content.to_string(), path, kind };
        if let Err(err) = self.store.upsert_file(&self.project_id, &file) {
            log::warn!("saving '{name}' to project {} failed: {err:#}", self.project_id);
        }
    }

    /// Remove one file from the store. Failures are logged and swallowed.
    pub fn delete(&mut self, name: &str) {
        let (base, _, _) = storage_location(name);
        if let Err(err) = self.store.delete_file(&self.project_id, &base) {
            log::warn!("deleting '{name}' from project {} failed: {err:#}", self.project_id);
        }
    }

    /// Fetch the project's file list. Unlike writes, a failed fetch
    /// propagates, and the caller decides how to surface a broken load.
    pub fn list_files(&mut self) -> Result<Vec<StoredFile>> {
        self.store.list_files(&self.project_id)
    }
}

/// An in-process store keyed by `(project, file name)`. Cloning shares the
/// underlying map, so a test or an offline host can keep a handle and watch
/// what the synchronizer writes.
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Rc<RefCell<HashMap<(String, String), StoredFile>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, project_id: &str, name: &str) -> Option<StoredFile> {
        self.inner.borrow().get(&(project_id.to_string(), name.to_string())).cloned()
    }

    pub fn file_count(&self, project_id: &str) -> usize {
        self.inner.borrow().keys().filter(|(p, _)| p == project_id).count()
    }
}

impl ProjectStore for MemoryStore {
    fn list_files(&mut self, project_id: &str) -> Result<Vec<StoredFile>> {
        let mut files: Vec<StoredFile> = self
            .inner
            .borrow()
            .iter()
            .filter(|((p, _), _)| p == project_id)
            .map(|(_, f)| f.clone())
            .collect();
        files.sort_by(|a, b| (&a.path, &a.name).cmp(&(&b.path, &b.name)));
        Ok(files)
    }

    fn upsert_file(&mut self, project_id: &str, file: &StoredFile) -> Result<()> {
        self.inner
            .borrow_mut()
            .insert((project_id.to_string(), file.name.clone()), file.clone());
        Ok(())
    }

    fn delete_file(&mut self, project_id: &str, name: &str) -> Result<()> {
        self.inner.borrow_mut().remove(&(project_id.to_string(), name.to_string()));
        Ok(())
    }
}
