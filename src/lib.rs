//! Lineage Recorder - a code-edit audit trail for AI agents and humans.
//!
//! This library records which task changed which file or symbol, via which
//! tool, with before/after content hashes, into a project-local lineage store.
//! It also resolves the currently active task from that store.
//!
//! Every public operation degrades to "nothing happened" when the store is
//! missing, incompatible, or served by a backend that is not implemented yet.

pub mod config;
pub mod models;
pub mod recorder;
pub mod storage;

pub use config::LineageConfig;
pub use models::{ActiveTask, ChangeType, CodeChange, NewChange};
pub use recorder::{LineageRecorder, get_active_task, record_change, record_to_lineage};
pub use storage::{BackendType, StoreLocation, find_lineage_db};


/// Library-level error type for lineage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Config parse error: {0}")]
    Kdl(#[from] kdl::KdlError),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Lineage backend not implemented: {0}")]
    Unimplemented(storage::BackendType),
}

/// Result type alias for lineage operations.
pub type Result<T> = std::result::Result<T, Error>;
