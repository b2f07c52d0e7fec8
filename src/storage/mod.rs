//! Storage layer for lineage data.
//!
//! This module finds the project-local lineage store and hands out a backend
//! for it.
//!
//! ## Store Layouts
//!
//! Searched in each directory from the start directory up to the root:
//!
//! - **SQLite store** (preferred): `<dir>/.spectrena/lineage.db`
//! - **SurrealDB store**: `<dir>/.spectrena/lineage/` (backend not implemented)
//!
//! The first directory holding either layout wins. Within one directory the
//! SQLite file beats the SurrealDB directory.

pub mod backend;
pub mod sqlite;
pub mod surreal;

pub use backend::{BackendType, ChangeRow, LineageBackend};
pub use sqlite::SqliteBackend;
pub use surreal::SurrealBackend;

use crate::config::LineageConfig;
use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};

/// Number of hex characters kept from a content digest.
pub const CONTENT_HASH_LEN: usize = 16;

/// A located lineage store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLocation {
    pub path: PathBuf,
    pub backend: BackendType,
}

impl StoreLocation {
    /// Open the backend serving this store.
    pub fn open(&self) -> Box<dyn LineageBackend> {
        match self.backend {
            BackendType::Sqlite => Box::new(SqliteBackend::new(self.path.clone())),
            BackendType::Surreal => Box::new(SurrealBackend::new(self.path.clone())),
        }
    }
}

/// Search `start` and its ancestors for a lineage store.
///
/// Relative starts are resolved against the working directory first, so the
/// walk always ends at the filesystem root. Pure filesystem probing; nothing
/// is created or cached.
pub fn find_lineage_store(start: &Path, config: &LineageConfig) -> Option<StoreLocation> {
    let start = absolute_dir(start)?;
    start.ancestors().find_map(|dir| {
        let marker = dir.join(&config.marker_dir);

        let db_file = marker.join(&config.database_file);
        if db_file.is_file() {
            return Some(StoreLocation {
                path: db_file,
                backend: BackendType::Sqlite,
            });
        }

        let store_dir = marker.join(&config.store_dir);
        if store_dir.is_dir() {
            return Some(StoreLocation {
                path: store_dir,
                backend: BackendType::Surreal,
            });
        }

        None
    })
}

/// Make `path` absolute and fold `.` and `..` components lexically.
pub(crate) fn absolute_dir(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Some(normalized)
}

/// Find the lineage store path from the current working directory.
///
/// Returns `None` when no store exists between the working directory and the
/// filesystem root, or when the working directory cannot be read.
pub fn find_lineage_db() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_lineage_store(&cwd, &LineageConfig::default()).map(|location| location.path)
}

/// Fingerprint content as the first 16 hex characters of its SHA-256 digest.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let hash_hex = format!("{:x}", hasher.finalize());
    hash_hex[..CONTENT_HASH_LEN].to_string()
}

/// Current time as RFC 3339 with microseconds and an explicit `+00:00` offset.
///
/// Python tooling that shares the store reads it with `datetime.fromisoformat`,
/// which takes at most six fractional digits before 3.11.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}
