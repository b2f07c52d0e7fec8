//! Lineage recording for code-editing tools.
//!
//! Each stage returns `Result<Option<T>>` and short-circuits on the first
//! empty or failed step. The public methods collapse both cases to `None`:
//! the lineage trail is an auxiliary audit feature and must never break the
//! edit that triggered it.

use crate::Result;
use crate::config::{LineageConfig, discover_config};
use crate::models::{ActiveTask, ChangeType, CodeChange, NewChange};
use crate::storage::{ChangeRow, StoreLocation, content_hash, find_lineage_store, timestamp_now};
use std::path::{Path, PathBuf};

/// Reads the active task and appends change records for one project.
///
/// The store and the project's `.spectrena/lineage.kdl` are looked up again on
/// every call, so a recorder follows the working directory of the process
/// unless pinned with [`LineageRecorder::at`].
#[derive(Debug, Clone, Default)]
pub struct LineageRecorder {
    config: Option<LineageConfig>,
    start_dir: Option<PathBuf>,
}

impl LineageRecorder {
    /// Recorder with default settings, searching from the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder whose settings override the project's config file where they
    /// differ from the defaults.
    pub fn with_config(config: LineageConfig) -> Self {
        Self {
            config: Some(config),
            start_dir: None,
        }
    }

    /// Search from `dir` instead of the working directory.
    pub fn at(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    /// Settings in effect for the current start directory.
    pub fn config(&self) -> LineageConfig {
        match self.start_dir() {
            Some(start) => self.config_at(&start),
            None => self.config.clone().unwrap_or_default(),
        }
    }

    /// Locate the lineage store for this recorder.
    pub fn locate(&self) -> Option<StoreLocation> {
        let start = self.start_dir()?;
        find_lineage_store(&start, &self.config_at(&start))
    }

    /// Get the task currently marked active, with its plan and spec.
    pub fn get_active_task(&self) -> Option<ActiveTask> {
        match self.try_active_task() {
            Ok(task) => task,
            Err(e) => {
                tracing::warn!(error = %e, "lineage: active task lookup failed");
                None
            }
        }
    }

    /// Append a change record and return its identifier.
    ///
    /// Returns `None` when there is no store, no task to attribute the change
    /// to, or the store rejects the insert.
    pub fn record_change(&self, change: &NewChange) -> Option<i64> {
        match self.try_record_change(change) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    file_path = %change.file_path,
                    tool = %change.tool_used,
                    "lineage: change not recorded"
                );
                None
            }
        }
    }

    /// Read the lineage trail of one task, oldest first.
    pub fn changes_for_task(&self, task_id: &str) -> Vec<CodeChange> {
        let Some(location) = self.enabled_store() else {
            return Vec::new();
        };
        location.open().changes_for_task(task_id).unwrap_or_else(|e| {
            tracing::warn!(error = %e, task_id, "lineage: could not read changes");
            Vec::new()
        })
    }

    fn start_dir(&self) -> Option<PathBuf> {
        match &self.start_dir {
            Some(dir) => Some(dir.clone()),
            None => std::env::current_dir().ok(),
        }
    }

    fn config_at(&self, start: &Path) -> LineageConfig {
        let mut config = discover_config(start);
        if let Some(explicit) = &self.config {
            config.merge(explicit);
        }
        config
    }

    /// The store to use, or `None` when recording is disabled or no store exists.
    fn enabled_store(&self) -> Option<StoreLocation> {
        let start = self.start_dir()?;
        let config = self.config_at(&start);
        if !config.enabled {
            tracing::debug!("lineage: recording disabled");
            return None;
        }
        let location = find_lineage_store(&start, &config);
        if location.is_none() {
            tracing::debug!("lineage: no store found");
        }
        location
    }

    fn try_active_task(&self) -> Result<Option<ActiveTask>> {
        let Some(location) = self.enabled_store() else {
            return Ok(None);
        };
        location.open().active_task()
    }

    fn try_record_change(&self, change: &NewChange) -> Result<Option<i64>> {
        let Some(location) = self.enabled_store() else {
            return Ok(None);
        };
        let backend = location.open();

        let task_id = match &change.task_id {
            Some(id) => id.clone(),
            None => match backend.active_task()? {
                Some(task) => task.current_task_id,
                None => {
                    tracing::debug!("lineage: no active task, skipping record");
                    return Ok(None);
                }
            },
        };

        let row = ChangeRow {
            task_id: &task_id,
            file_path: &change.file_path,
            symbol_fqn: change.symbol_fqn.as_deref(),
            change_type: change.change_type.as_str(),
            tool_used: &change.tool_used,
            old_content_hash: change.old_content.as_deref().map(content_hash),
            new_content_hash: change.new_content.as_deref().map(content_hash),
            timestamp: timestamp_now(),
        };
        let id = backend.insert_change(&row)?;

        tracing::debug!(id, task_id = %task_id, file_path = %change.file_path, "lineage: change recorded");
        Ok(Some(id))
    }
}

/// Get the active task of the project enclosing the working directory.
pub fn get_active_task() -> Option<ActiveTask> {
    LineageRecorder::new().get_active_task()
}

/// Record a change in the project enclosing the working directory.
pub fn record_change(change: &NewChange) -> Option<i64> {
    LineageRecorder::new().record_change(change)
}

/// Record an edit made by a symbol-editing tool.
///
/// Never fails. With `task_id` set the active task is not consulted.
pub fn record_to_lineage(
    task_id: Option<&str>,
    file_path: &str,
    change_type: ChangeType,
    tool_used: &str,
    symbol_fqn: Option<&str>,
    old_content: Option<&str>,
    new_content: Option<&str>,
) {
    let change = NewChange {
        task_id: task_id.map(str::to_string),
        file_path: file_path.to_string(),
        change_type,
        tool_used: tool_used.to_string(),
        symbol_fqn: symbol_fqn.map(str::to_string),
        old_content: old_content.map(str::to_string),
        new_content: new_content.map(str::to_string),
    };
    if record_change(&change).is_none() {
        tracing::debug!(file_path, tool = tool_used, "lineage: edit not attributed to a task");
    }
}
