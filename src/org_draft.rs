//! Organization draft storage.
//!
//! The organization setup flow persists a partially completed organization
//! (`{ "organizationID": ..., "name": ... }`) so that units can be attached to
//! it before the organization is finalized. This crate only reads it.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::types::OrgDraft;

pub trait OrgDraftStore: Send + Sync {
    /// Current draft, or `None` when nothing has been persisted.
    fn load(&self) -> Result<Option<OrgDraft>, String>;
}

/// Draft persisted as a JSON file (default `~/.pmdash/org_draft.json`).
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OrgDraftStore for FileDraftStore {
    fn load(&self) -> Result<Option<OrgDraft>, String> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read {}: {}", self.path.display(), e))?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        // A literal `null` is how a cleared draft is stored.
        serde_json::from_str::<Option<OrgDraft>>(&content)
            .map_err(|e| format!("Failed to parse {}: {}", self.path.display(), e))
    }
}

#[derive(Default)]
pub struct MemoryDraftStore {
    draft: Mutex<Option<OrgDraft>>,
}

impl MemoryDraftStore {
    pub fn new(draft: Option<OrgDraft>) -> Self {
        Self {
            draft: Mutex::new(draft),
        }
    }

    pub fn set(&self, draft: Option<OrgDraft>) {
        *self.draft.lock() = draft;
    }
}

impl OrgDraftStore for MemoryDraftStore {
    fn load(&self) -> Result<Option<OrgDraft>, String> {
        Ok(self.draft.lock().clone())
    }
}
