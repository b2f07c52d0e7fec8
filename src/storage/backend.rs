//! Lineage backend trait and backend types.
//!
//! This module describes the two store layouts a project can carry:
//! - `Sqlite` - single-file embedded database (`lineage.db`)
//! - `Surreal` - directory-form store (`lineage/`), not implemented yet

use crate::Result;
use crate::models::{ActiveTask, CodeChange};

/// A change with content already reduced to hashes, ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRow<'a> {
    pub task_id: &'a str,
    pub file_path: &'a str,
    pub symbol_fqn: Option<&'a str>,
    pub change_type: &'a str,
    pub tool_used: &'a str,
    pub old_content_hash: Option<String>,
    pub new_content_hash: Option<String>,
    pub timestamp: String,
}

/// Trait for stores that hold lineage records.
///
/// `Ok(None)` means "nothing applicable"; `Err` means the store could not
/// answer (missing table, constraint failure, unimplemented backend).
pub trait LineageBackend {
    /// Read the active task from the singleton phase state.
    fn active_task(&self) -> Result<Option<ActiveTask>>;

    /// Append one change record and return its identifier.
    fn insert_change(&self, row: &ChangeRow<'_>) -> Result<i64>;

    /// Read every change attributed to `task_id`, oldest first.
    fn changes_for_task(&self, task_id: &str) -> Result<Vec<CodeChange>>;
}

/// Available lineage store layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Single-file SQLite database - .spectrena/lineage.db
    Sqlite,
    /// Directory-form SurrealDB store - .spectrena/lineage/ (future)
    Surreal,
}

impl BackendType {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Surreal => "surrealdb",
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
