//! KDL schema definition for the lineage config.
//!
//! This module provides:
//! - The Rust struct representing the KDL schema
//! - Serialization/deserialization to/from KDL format
//! - Validation and default values

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

/// Default project marker directory.
pub const DEFAULT_MARKER_DIR: &str = ".spectrena";

/// Default file name of the single-file (SQLite) store.
pub const DEFAULT_DATABASE_FILE: &str = "lineage.db";

/// Default directory name of the directory-form (SurrealDB) store.
pub const DEFAULT_STORE_DIR: &str = "lineage";

/// Recorder settings.
///
/// # KDL Schema
///
/// ```kdl
/// marker-dir ".spectrena"
/// database-file "lineage.db"
/// store-dir "lineage"
/// enabled #true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageConfig {
    /// Directory looked up in each ancestor (e.g., ".spectrena")
    pub marker_dir: String,

    /// File-form store name inside the marker directory
    pub database_file: String,

    /// Directory-form store name inside the marker directory
    pub store_dir: String,

    /// When false, every recorder operation is a no-op
    pub enabled: bool,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            marker_dir: DEFAULT_MARKER_DIR.to_string(),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            store_dir: DEFAULT_STORE_DIR.to_string(),
            enabled: true,
        }
    }
}

impl LineageConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        for (key, value) in [
            ("marker-dir", &self.marker_dir),
            ("database-file", &self.database_file),
            ("store-dir", &self.store_dir),
        ] {
            if value.is_empty() {
                return Err(format!("{} must not be empty", key));
            }
            if value.contains(['/', '\\']) || value == "." || value == ".." {
                return Err(format!("{} must be a plain name, got {}", key, value));
            }
        }
        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they differ from the default.
    pub fn merge(&mut self, other: &LineageConfig) {
        let defaults = Self::default();
        if other.marker_dir != defaults.marker_dir {
            self.marker_dir = other.marker_dir.clone();
        }
        if other.database_file != defaults.database_file {
            self.database_file = other.database_file.clone();
        }
        if other.store_dir != defaults.store_dir {
            self.store_dir = other.store_dir.clone();
        }
        if other.enabled != defaults.enabled {
            self.enabled = other.enabled;
        }
    }

    /// Parse config from a KDL document.
    ///
    /// Unknown nodes are ignored and missing nodes keep their defaults.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(s) = first_string(doc, "marker-dir") {
            config.marker_dir = s;
        }
        if let Some(s) = first_string(doc, "database-file") {
            config.database_file = s;
        }
        if let Some(s) = first_string(doc, "store-dir") {
            config.store_dir = s;
        }
        if let Some(node) = doc.get("enabled") {
            if let Some(b) = node.entries().first().and_then(|e| e.value().as_bool()) {
                config.enabled = b;
            }
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        for (name, value) in [
            ("marker-dir", &self.marker_dir),
            ("database-file", &self.database_file),
            ("store-dir", &self.store_dir),
        ] {
            let mut node = KdlNode::new(name);
            node.push(KdlEntry::new(KdlValue::String(value.clone())));
            doc.nodes_mut().push(node);
        }

        let mut node = KdlNode::new("enabled");
        node.push(KdlEntry::new(KdlValue::Bool(self.enabled)));
        doc.nodes_mut().push(node);

        doc
    }
}

fn first_string(doc: &KdlDocument, name: &str) -> Option<String> {
    doc.get(name)?
        .entries()
        .first()?
        .value()
        .as_string()
        .map(str::to_string)
}
