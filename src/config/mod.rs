//! Configuration for the lineage recorder.
//!
//! Settings live in an optional `.spectrena/lineage.kdl` file (see [`schema`]
//! for the format), found by walking up from the start directory. An absent
//! file means defaults: look for `.spectrena/lineage.db`, then
//! `.spectrena/lineage/`, with recording enabled.

pub mod schema;

pub use schema::{DEFAULT_DATABASE_FILE, DEFAULT_MARKER_DIR, DEFAULT_STORE_DIR, LineageConfig};

use crate::storage::absolute_dir;
use crate::{Error, Result};
use kdl::KdlDocument;
use std::fs;
use std::path::Path;

/// Config file name inside the marker directory.
pub const CONFIG_FILE: &str = "lineage.kdl";

/// Find and load the nearest `.spectrena/lineage.kdl` above `start`.
///
/// Never fails: a missing file gives defaults, and a broken one is logged
/// and replaced by defaults.
pub fn discover_config(start: &Path) -> LineageConfig {
    let Some(start) = absolute_dir(start) else {
        return LineageConfig::default();
    };
    let Some(path) = start
        .ancestors()
        .map(|dir| dir.join(DEFAULT_MARKER_DIR).join(CONFIG_FILE))
        .find(|path| path.is_file())
    else {
        return LineageConfig::default();
    };

    load_config(&path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, path = %path.display(), "lineage: ignoring config file");
        LineageConfig::default()
    })
}

/// Load a config file, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<LineageConfig> {
    if !path.exists() {
        return Ok(LineageConfig::default());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<LineageConfig> {
    let doc: KdlDocument = content.parse()?;
    let config = LineageConfig::from_kdl(&doc);
    config.validate().map_err(Error::Config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join("lineage.kdl")).unwrap();
        assert_eq!(config, LineageConfig::default());
    }

    #[test]
    fn test_load_config_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lineage.kdl");
        fs::write(&path, "store-dir \"surreal\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.store_dir, "surreal");
        assert_eq!(config.marker_dir, DEFAULT_MARKER_DIR);
    }

    #[test]
    fn test_discover_config_from_nested_dir() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join(DEFAULT_MARKER_DIR);
        fs::create_dir_all(&marker).unwrap();
        fs::write(marker.join(CONFIG_FILE), "enabled #false\n").unwrap();
        let nested = temp.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();

        let config = discover_config(&nested);
        assert!(!config.enabled);
        assert_eq!(config.database_file, DEFAULT_DATABASE_FILE);
    }

    #[test]
    fn test_discover_config_without_file_is_default() {
        let temp = TempDir::new().unwrap();
        assert_eq!(discover_config(temp.path()), LineageConfig::default());
    }

    #[test]
    fn test_discover_config_invalid_file_is_default() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join(DEFAULT_MARKER_DIR);
        fs::create_dir_all(&marker).unwrap();
        fs::write(marker.join(CONFIG_FILE), "marker-dir \"../up\"\n").unwrap();

        assert_eq!(discover_config(temp.path()), LineageConfig::default());
    }

    #[test]
    fn test_parse_config_syntax_error() {
        let result = parse_config("marker-dir \"unterminated");
        assert!(matches!(result, Err(Error::Kdl(_))));
    }

    #[test]
    fn test_parse_config_invalid_value() {
        let result = parse_config("marker-dir \"../up\"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
