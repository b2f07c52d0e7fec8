//! SQLite lineage backend.
//!
//! Every operation opens its own connection and drops it before returning.
//! Connections never use `SQLITE_OPEN_CREATE`: the store belongs to the
//! planning workflow and this backend only reads and appends.

use super::backend::{ChangeRow, LineageBackend};
use crate::Result;
use crate::models::{ActiveTask, CodeChange};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::path::{Path, PathBuf};

/// Backend for a single-file `lineage.db` store.
pub struct SqliteBackend {
    path: PathBuf,
}

impl SqliteBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_read_only(&self) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    fn open_read_write(&self) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }
}

impl LineageBackend for SqliteBackend {
    fn active_task(&self) -> Result<Option<ActiveTask>> {
        let conn = self.open_read_only()?;

        // No row and a NULL column both mean "no active task".
        let current: Option<Option<String>> = conn
            .query_row(
                "SELECT current_task_id FROM phase_state ORDER BY id LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let Some(task_id) = current.flatten() else {
            return Ok(None);
        };

        let task = conn
            .query_row(
                "SELECT t.task_id, t.title, p.plan_id, s.spec_id
                 FROM tasks t
                 JOIN plans p ON p.plan_id = t.plan_id
                 JOIN specs s ON s.spec_id = p.spec_id
                 WHERE t.task_id = ?1",
                [&task_id],
                |row| {
                    Ok(ActiveTask {
                        current_task_id: row.get(0)?,
                        title: row.get(1)?,
                        plan_id: row.get(2)?,
                        spec_id: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(task)
    }

    fn insert_change(&self, row: &ChangeRow<'_>) -> Result<i64> {
        let mut conn = self.open_read_write()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO code_changes (
                task_id, file_path, symbol_fqn, change_type, tool_used,
                old_content_hash, new_content_hash, timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                row.task_id,
                row.file_path,
                row.symbol_fqn,
                row.change_type,
                row.tool_used,
                row.old_content_hash,
                row.new_content_hash,
                row.timestamp,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    fn changes_for_task(&self, task_id: &str) -> Result<Vec<CodeChange>> {
        let conn = self.open_read_only()?;
        let mut stmt = conn.prepare(
            "SELECT id, task_id, file_path, symbol_fqn, change_type, tool_used,
                    old_content_hash, new_content_hash, timestamp
             FROM code_changes WHERE task_id = ?1 ORDER BY id",
        )?;
        let changes = stmt
            .query_map([task_id], |row| {
                Ok(CodeChange {
                    id: row.get(0)?,
                    task_id: row.get(1)?,
                    file_path: row.get(2)?,
                    symbol_fqn: row.get(3)?,
                    change_type: row.get(4)?,
                    tool_used: row.get(5)?,
                    old_content_hash: row.get(6)?,
                    new_content_hash: row.get(7)?,
                    timestamp: row.get(8)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(changes)
    }
}
