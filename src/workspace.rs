//! The multi-file project store: named documents, kind rules, and validated
//! create/delete/update/rename operations.

use crate::sync::StoredFile;
use crate::types::{Document, FileKind};
use anyhow::{bail, Result};
use std::collections::HashMap;

/// Decide what kind of file a name denotes.
///
/// `Move.toml` is the generated manifest; anything under `build/` or ending
/// in `.mv` is a compiler artifact; the rest is editable source.
pub fn kind_for(name: &str) -> FileKind {
    if name == "Move.toml" {
        FileKind::Config
    } else if name.starts_with("build/") || name.ends_with(".mv") {
        FileKind::Build
    } else {
        FileKind::Source
    }
}

/// Normalize a user-supplied file name to its full workspace name: bare
/// names go under `sources/`.
fn full_name(name: &str) -> String {
    if name.contains('/') || name == "Move.toml" {
        name.to_string()
    } else {
        format!("sources/{name}")
    }
}

/// The set of open files. Mutated only through the validated operations
/// below; the persistence layer only ever receives content values copied out
/// at flush time.
#[derive(Default)]
pub struct Workspace {
    documents: HashMap<String, Document>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.documents.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }

    pub fn content(&self, name: &str) -> Option<&str> {
        self.documents.get(name).map(Document::content)
    }

    /// All file names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut v: Vec<String> = self.documents.keys().cloned().collect();
        v.sort();
        v
    }

    /// Create a file. Bare names land under `sources/`. Returns the full
    /// stored name. Rejected before any mutation: empty names and
    /// collisions.
    pub fn add_file(&mut self, name: &str, content: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            bail!("file name cannot be empty");
        }
        let full = full_name(name);
        if self.documents.contains_key(&full) {
            bail!("a file named '{full}' already exists");
        }
        let kind = kind_for(&full);
        self.documents.insert(full.clone(), Document::new(&full, content, kind));
        Ok(full)
    }

    /// Delete a file. Rejected: unknown names, read-only files, and deleting
    /// the last remaining file.
    pub fn delete_file(&mut self, name: &str) -> Result<()> {
        let Some(doc) = self.documents.get(name) else {
            bail!("no file named '{name}'");
        };
        if doc.read_only() {
            bail!("'{name}' is read-only and cannot be deleted");
        }
        if self.documents.len() == 1 {
            bail!("cannot delete the last file");
        }
        self.documents.remove(name);
        Ok(())
    }

    /// Set a file's content. Unknown names are created on the fly (an edit
    /// settling against a file the store has not seen yet); read-only files
    /// reject the update.
    pub fn update_file(&mut self, name: &str, content: &str) -> Result<()> {
        match self.documents.get_mut(name) {
            Some(doc) if doc.read_only() => bail!("'{name}' is read-only"),
            Some(doc) => {
                doc.set_content(content.to_string());
                Ok(())
            }
            None => {
                let kind = kind_for(name);
                self.documents.insert(name.to_string(), Document::new(name, content, kind));
                Ok(())
            }
        }
    }

    /// Rename is delete+create: the old document is removed and a new one is
    /// created with the same content. Returns the new full name. All
    /// validation happens before any mutation.
    pub fn rename_file(&mut self, old: &str, new: &str) -> Result<String> {
        let Some(doc) = self.documents.get(old) else {
            bail!("no file named '{old}'");
        };
        if doc.read_only() {
            bail!("'{old}' is read-only and cannot be renamed");
        }
        let new = new.trim();
        if new.is_empty() {
            bail!("file name cannot be empty");
        }
        let full = full_name(new);
        if full != old && self.documents.contains_key(&full) {
            bail!("a file named '{full}' already exists");
        }
        if full == old {
            return Ok(full);
        }
        let content = doc.content().to_string();
        self.documents.remove(old);
        let kind = kind_for(&full);
        self.documents.insert(full.clone(), Document::new(&full, content, kind));
        Ok(full)
    }

    /// Replace the whole document set from store records. The store's kind is
    /// authoritative; read-only follows from it.
    pub fn load_from_store(&mut self, files: &[StoredFile]) {
        self.documents.clear();
        for f in files {
            let name = if f.path.is_empty() {
                f.name.clone()
            } else {
                format!("{}/{}", f.path, f.name)
            };
            self.documents.insert(name.clone(), Document::new(&name, &f.content, f.kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Workspace {
        let mut ws = Workspace::new();
        ws.add_file("counter.move", "module 0x1::counter {}").unwrap();
        ws.add_file("bank.move", "module 0x1::bank {}").unwrap();
        ws
    }

    // ==================== kind derivation tests ====================

    #[test]
    fn kind_rules() {
        assert_eq!(kind_for("Move.toml"), FileKind::Config);
        assert_eq!(kind_for("build/counter/bytecode.mv"), FileKind::Build);
        assert_eq!(kind_for("sources/counter.mv"), FileKind::Build);
        assert_eq!(kind_for("sources/counter.move"), FileKind::Source);
    }

    #[test]
    fn read_only_follows_kind() {
        let mut ws = Workspace::new();
        ws.load_from_store(&[
            StoredFile {
                name: "Move.toml".into(),
                content: "[package]".into(),
                path: String::new(),
                kind: FileKind::Config,
            },
            StoredFile {
                name: "counter.move".into(),
                content: String::new(),
                path: "sources".into(),
                kind: FileKind::Source,
            },
        ]);
        assert!(ws.get("Move.toml").unwrap().read_only());
        assert!(!ws.get("sources/counter.move").unwrap().read_only());
    }

    // ==================== create tests ====================

    #[test]
    fn bare_names_land_under_sources() {
        let mut ws = Workspace::new();
        let full = ws.add_file("counter.move", "").unwrap();
        assert_eq!(full, "sources/counter.move");
        assert!(ws.contains("sources/counter.move"));
    }

    #[test]
    fn pathed_names_are_kept() {
        let mut ws = Workspace::new();
        let full = ws.add_file("sources/nested/mod.move", "").unwrap();
        assert_eq!(full, "sources/nested/mod.move");
    }

    #[test]
    fn empty_name_rejected() {
        let mut ws = Workspace::new();
        assert!(ws.add_file("   ", "").is_err());
        assert!(ws.is_empty());
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut ws = seeded();
        let err = ws.add_file("counter.move", "other").unwrap_err();
        assert!(err.to_string().contains("already exists"));
        // no partial state: content untouched
        assert_eq!(ws.content("sources/counter.move"), Some("module 0x1::counter {}"));
    }

    // ==================== delete tests ====================

    #[test]
    fn delete_removes_file() {
        let mut ws = seeded();
        ws.delete_file("sources/bank.move").unwrap();
        assert!(!ws.contains("sources/bank.move"));
        assert_eq!(ws.len(), 1);
    }

    #[test]
    fn delete_unknown_rejected() {
        let mut ws = seeded();
        assert!(ws.delete_file("sources/nope.move").is_err());
    }

    #[test]
    fn delete_last_file_rejected() {
        let mut ws = Workspace::new();
        ws.add_file("only.move", "").unwrap();
        let err = ws.delete_file("sources/only.move").unwrap_err();
        assert!(err.to_string().contains("last file"));
        assert_eq!(ws.len(), 1);
    }

    #[test]
    fn delete_read_only_rejected() {
        let mut ws = Workspace::new();
        ws.load_from_store(&[StoredFile {
            name: "Move.toml".into(),
            content: String::new(),
            path: String::new(),
            kind: FileKind::Config,
        }]);
        ws.add_file("a.move", "").unwrap();
        assert!(ws.delete_file("Move.toml").is_err());
    }

    // ==================== update tests ====================

    #[test]
    fn update_sets_content() {
        let mut ws = seeded();
        ws.update_file("sources/counter.move", "new content").unwrap();
        assert_eq!(ws.content("sources/counter.move"), Some("new content"));
    }

    #[test]
    fn update_creates_missing_file() {
        let mut ws = Workspace::new();
        ws.update_file("sources/fresh.move", "x").unwrap();
        assert_eq!(ws.content("sources/fresh.move"), Some("x"));
    }

    #[test]
    fn update_read_only_rejected() {
        let mut ws = Workspace::new();
        ws.load_from_store(&[StoredFile {
            name: "Move.toml".into(),
            content: "original".into(),
            path: String::new(),
            kind: FileKind::Config,
        }]);
        assert!(ws.update_file("Move.toml", "tampered").is_err());
        assert_eq!(ws.content("Move.toml"), Some("original"));
    }

    // ==================== rename tests ====================

    #[test]
    fn rename_is_delete_plus_create() {
        let mut ws = seeded();
        let new = ws.rename_file("sources/counter.move", "tally.move").unwrap();
        assert_eq!(new, "sources/tally.move");
        assert!(!ws.contains("sources/counter.move"));
        assert_eq!(ws.content("sources/tally.move"), Some("module 0x1::counter {}"));
    }

    #[test]
    fn rename_collision_rejected() {
        let mut ws = seeded();
        let err = ws.rename_file("sources/counter.move", "bank.move").unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(ws.contains("sources/counter.move"));
    }

    #[test]
    fn rename_to_same_name_is_noop() {
        let mut ws = seeded();
        let new = ws.rename_file("sources/counter.move", "counter.move").unwrap();
        assert_eq!(new, "sources/counter.move");
        assert_eq!(ws.len(), 2);
    }

    // ==================== load tests ====================

    #[test]
    fn load_replaces_documents() {
        let mut ws = seeded();
        ws.load_from_store(&[StoredFile {
            name: "fresh.move".into(),
            content: "new".into(),
            path: "sources".into(),
            kind: FileKind::Source,
        }]);
        assert_eq!(ws.len(), 1);
        assert_eq!(ws.content("sources/fresh.move"), Some("new"));
    }

    #[test]
    fn names_are_sorted() {
        let ws = seeded();
        assert_eq!(ws.names(), vec!["sources/bank.move", "sources/counter.move"]);
    }
}
