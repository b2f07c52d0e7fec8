//! Data models for lineage entities.
//!
//! This module defines the core data structures:
//! - `ChangeType` - The kind of edit a change record describes
//! - `ActiveTask` - The task currently marked in-progress, with its plan and spec
//! - `NewChange` - A change about to be recorded
//! - `CodeChange` - A change record read back from the store

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of edit recorded in the lineage trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Create,
    Modify,
    Rename,
    Delete,
}

impl ChangeType {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "create" => Some(Self::Create),
            "modify" => Some(Self::Modify),
            "rename" => Some(Self::Rename),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Get the string representation stored in `code_changes.change_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Rename => "rename",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The task referenced by the singleton `phase_state` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTask {
    /// Task identifier (e.g., "TASK-001")
    pub current_task_id: String,

    /// Task title
    pub title: String,

    /// Owning plan identifier
    pub plan_id: String,

    /// Owning spec identifier
    pub spec_id: String,
}

/// A change about to be appended to the lineage trail.
///
/// Content is hashed on insert; the raw text never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChange {
    /// Explicit task; `None` means "attribute to the active task"
    pub task_id: Option<String>,

    /// Path of the edited file
    pub file_path: String,

    /// Kind of edit
    pub change_type: ChangeType,

    /// Name of the tool that performed the edit
    pub tool_used: String,

    /// Fully-qualified name of the edited symbol
    pub symbol_fqn: Option<String>,

    /// Content before the edit
    pub old_content: Option<String>,

    /// Content after the edit
    pub new_content: Option<String>,
}

impl NewChange {
    /// Create a change with only the required fields set.
    pub fn new(
        file_path: impl Into<String>,
        change_type: ChangeType,
        tool_used: impl Into<String>,
    ) -> Self {
        Self {
            task_id: None,
            file_path: file_path.into(),
            change_type,
            tool_used: tool_used.into(),
            symbol_fqn: None,
            old_content: None,
            new_content: None,
        }
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn with_symbol(mut self, symbol_fqn: impl Into<String>) -> Self {
        self.symbol_fqn = Some(symbol_fqn.into());
        self
    }

    pub fn with_old_content(mut self, content: impl Into<String>) -> Self {
        self.old_content = Some(content.into());
        self
    }

    pub fn with_new_content(mut self, content: impl Into<String>) -> Self {
        self.new_content = Some(content.into());
        self
    }
}

/// A change record as stored in `code_changes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeChange {
    /// Auto-assigned row identifier
    pub id: i64,

    pub task_id: String,

    pub file_path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_fqn: Option<String>,

    /// Stored change kind. Kept as text since other writers share the table.
    pub change_type: String,

    pub tool_used: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_content_hash: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_content_hash: Option<String>,

    /// RFC 3339 timestamp with offset
    pub timestamp: String,
}

impl CodeChange {
    /// Parsed change kind, if the stored text is a known one.
    pub fn kind(&self) -> Option<ChangeType> {
        ChangeType::parse(&self.change_type)
    }
}
