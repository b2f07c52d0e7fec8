//! Directory-form lineage backend.
//!
//! The `lineage/` directory layout belongs to a SurrealDB store that this
//! crate cannot read yet. Every operation reports `Error::Unimplemented` so
//! callers can tell "store found, backend missing" apart from "no store".

use super::backend::{BackendType, ChangeRow, LineageBackend};
use crate::models::{ActiveTask, CodeChange};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Backend for a directory-form `lineage/` store.
pub struct SurrealBackend {
    path: PathBuf,
}

impl SurrealBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineageBackend for SurrealBackend {
    fn active_task(&self) -> Result<Option<ActiveTask>> {
        Err(Error::Unimplemented(BackendType::Surreal))
    }

    fn insert_change(&self, _row: &ChangeRow<'_>) -> Result<i64> {
        Err(Error::Unimplemented(BackendType::Surreal))
    }

    fn changes_for_task(&self, _task_id: &str) -> Result<Vec<CodeChange>> {
        Err(Error::Unimplemented(BackendType::Surreal))
    }
}
