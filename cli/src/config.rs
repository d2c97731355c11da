//! Configuration file support.
//!
//! The CLI reads flag defaults from a JSON file (`mirror.json` in the
//! working directory unless `--config` points elsewhere). A missing file is
//! created with default values first, so users always have a template to
//! edit. Command-line flags win over configuration values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name used when `--config` is not given.
pub const DEFAULT_FILE_NAME: &str = "mirror.json";

/// Defaults applied to every verb unless overridden by a flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CliConfig {
    /// Overwrite existing destination files
    pub overwrite: bool,
    /// Show copy and hash progress
    pub enable_progress: bool,
    /// Delete source files once their copy has verified
    pub delete_source_if_verified: bool,
    /// Digest algorithm name (md5, sha1, sha256, sha384, sha512)
    pub hash_algorithm: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            overwrite: false,
            enable_progress: false,
            delete_source_if_verified: false,
            hash_algorithm: "sha256".to_string(),
        }
    }
}

impl CliConfig {
    /// Load the configuration, creating the file with defaults if absent.
    ///
    /// # Errors
    /// Returns an `io::Error` if the file cannot be read or written, or if
    /// its contents are not valid JSON for this structure.
    pub fn load_or_create(path: Option<&Path>) -> io::Result<CliConfig> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));

        if !path.exists() {
            let defaults = CliConfig::default();
            let json = serde_json::to_string_pretty(&defaults)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            fs::write(&path, json)?;
            return Ok(defaults);
        }

        let contents = fs::read_to_string(&path)?;
        serde_json::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("mirror.json");

        let config = CliConfig::load_or_create(Some(&path)).expect("Failed to load config");
        assert!(path.exists(), "Config file should be created");
        assert!(!config.overwrite);
        assert_eq!(config.hash_algorithm, "sha256");
    }

    #[test]
    fn test_existing_file_round_trips() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("mirror.json");
        fs::write(
            &path,
            r#"{ "overwrite": true, "hashAlgorithm": "sha512" }"#,
        )
        .expect("Failed to write config");

        let config = CliConfig::load_or_create(Some(&path)).expect("Failed to load config");
        assert!(config.overwrite);
        assert_eq!(config.hash_algorithm, "sha512");
        // Unspecified fields keep their defaults
        assert!(!config.enable_progress);
        assert!(!config.delete_source_if_verified);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("mirror.json");
        fs::write(&path, "not json").expect("Failed to write config");

        let result = CliConfig::load_or_create(Some(&path));
        assert!(result.is_err());
    }
}
