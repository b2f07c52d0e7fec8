//! Common test utilities for lineage integration tests.
//!
//! Provides `TestProject`, a temporary project root that may hold a
//! `.spectrena` store, and `CwdGuard`, which moves the process into a
//! directory and restores the previous one on drop. Tests that change the
//! working directory must be marked `#[serial]`.

#![allow(dead_code)]

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

const LINEAGE_SCHEMA: &str = r#"
    CREATE TABLE specs (spec_id TEXT PRIMARY KEY, title TEXT NOT NULL);
    CREATE TABLE plans (
        plan_id TEXT PRIMARY KEY,
        spec_id TEXT NOT NULL,
        title TEXT NOT NULL,
        FOREIGN KEY (spec_id) REFERENCES specs(spec_id)
    );
    CREATE TABLE tasks (
        task_id TEXT PRIMARY KEY,
        plan_id TEXT NOT NULL,
        title TEXT NOT NULL,
        FOREIGN KEY (plan_id) REFERENCES plans(plan_id)
    );
    CREATE TABLE phase_state (
        id INTEGER PRIMARY KEY,
        current_task_id TEXT,
        FOREIGN KEY (current_task_id) REFERENCES tasks(task_id)
    );
    CREATE TABLE code_changes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        task_id TEXT NOT NULL,
        file_path TEXT NOT NULL,
        symbol_fqn TEXT,
        change_type TEXT NOT NULL,
        tool_used TEXT NOT NULL,
        old_content_hash TEXT,
        new_content_hash TEXT,
        timestamp TEXT NOT NULL
    );
"#;

/// A row of `code_changes`, read back with plain SQL.
#[derive(Debug)]
pub struct StoredChange {
    pub id: i64,
    pub task_id: String,
    pub file_path: String,
    pub symbol_fqn: Option<String>,
    pub change_type: String,
    pub tool_used: String,
    pub old_content_hash: Option<String>,
    pub new_content_hash: Option<String>,
    pub timestamp: String,
}

/// A temporary project directory.
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    /// Project without any lineage store.
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Project with the full schema and no active task.
    pub fn with_schema() -> Self {
        let project = Self::empty();
        project.create_db_file();
        project.connect().execute_batch(LINEAGE_SCHEMA).unwrap();
        project
    }

    /// Project whose phase state points at `task_id`.
    pub fn with_active_task(task_id: &str) -> Self {
        let project = Self::with_schema();
        let conn = project.connect();
        conn.execute_batch(
            "INSERT INTO specs VALUES ('SPEC-001', 'Test Spec');
             INSERT INTO plans VALUES ('PLAN-001', 'SPEC-001', 'Test Plan');",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO tasks VALUES (?1, 'PLAN-001', 'Test Task')",
            [task_id],
        )
        .unwrap();
        conn.execute("INSERT INTO phase_state VALUES (1, ?1)", [task_id])
            .unwrap();
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.path().join(".spectrena").join("lineage.db")
    }

    pub fn create_db_file(&self) -> PathBuf {
        let path = self.db_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::File::create(&path).unwrap();
        path
    }

    pub fn create_store_dir(&self) -> PathBuf {
        let path = self.path().join(".spectrena").join("lineage");
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn connect(&self) -> Connection {
        Connection::open(self.db_path()).unwrap()
    }

    pub fn clear_active_task(&self) {
        self.connect()
            .execute("UPDATE phase_state SET current_task_id = NULL WHERE id = 1", [])
            .unwrap();
    }

    pub fn count_changes(&self) -> i64 {
        self.connect()
            .query_row("SELECT COUNT(*) FROM code_changes", [], |row| row.get(0))
            .unwrap()
    }

    /// All rows of `code_changes` in insertion order.
    pub fn changes(&self) -> Vec<StoredChange> {
        let conn = self.connect();
        let mut stmt = conn
            .prepare(
                "SELECT id, task_id, file_path, symbol_fqn, change_type, tool_used,
                        old_content_hash, new_content_hash, timestamp
                 FROM code_changes ORDER BY id",
            )
            .unwrap();
        stmt.query_map([], |row| {
            Ok(StoredChange {
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
        })
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
    }

    /// Move the process into `dir` until the guard drops.
    pub fn enter(&self, dir: &Path) -> CwdGuard {
        CwdGuard::enter(dir)
    }
}

/// Restores the previous working directory on drop.
pub struct CwdGuard {
    previous: PathBuf,
}

impl CwdGuard {
    pub fn enter(dir: &Path) -> Self {
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        Self { previous }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.previous);
    }
}
