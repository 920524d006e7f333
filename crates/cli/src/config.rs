//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `POCKET_STORE_DATA_DIR` - Directory holding the saved cart (default: .pocket-store)
//! - `POCKET_STORE_CATALOG` - JSON catalog file replacing the built-in products

use std::path::{Path, PathBuf};

use pocket_store_core::{Catalog, CatalogError};
use thiserror::Error;

const DEFAULT_DATA_DIR: &str = ".pocket-store";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Cannot read catalog {}: {source}", path.display())]
    ReadCatalog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid catalog {}: {source}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory of the file-backed cart storage
    pub data_dir: PathBuf,
    /// Catalog file; `None` uses the built-in sample catalog
    pub catalog_path: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but empty.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = get_non_empty(&lookup, "POCKET_STORE_DATA_DIR")?
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let catalog_path = get_non_empty(&lookup, "POCKET_STORE_CATALOG")?.map(PathBuf::from);

        Ok(Self {
            data_dir,
            catalog_path,
        })
    }

    /// Replace the data directory (from `--data-dir`).
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }

    /// Load the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the catalog file cannot be read or decoded.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        self.catalog_path
            .as_deref()
            .map_or_else(|| Ok(Catalog::sample()), load_catalog_file)
    }
}

fn load_catalog_file(path: &Path) -> Result<Catalog, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadCatalog {
        path: path.to_path_buf(),
        source,
    })?;
    Catalog::from_json(&json).map_err(|source| ConfigError::Catalog {
        path: path.to_path_buf(),
        source,
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, rejecting values that are present but blank.
fn get_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<String>, ConfigError> {
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be empty".to_string(),
        )),
        other => Ok(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".pocket-store"));
        assert_eq!(config.catalog_path, None);
    }

    #[test]
    fn test_reads_variables() {
        let config = CliConfig::from_vars(vars(&[
            ("POCKET_STORE_DATA_DIR", "/var/lib/pocket"),
            ("POCKET_STORE_CATALOG", "catalog.json"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/pocket"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.json")));
    }

    #[test]
    fn test_rejects_blank_values() {
        let result = CliConfig::from_vars(vars(&[("POCKET_STORE_DATA_DIR", "  ")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "POCKET_STORE_DATA_DIR"));
    }

    #[test]
    fn test_flag_overrides_data_dir() {
        let config = CliConfig::from_vars(vars(&[("POCKET_STORE_DATA_DIR", "env-dir")]))
            .unwrap()
            .with_data_dir(Some(PathBuf::from("flag-dir")));
        assert_eq!(config.data_dir, PathBuf::from("flag-dir"));

        let unchanged = config.clone().with_data_dir(None);
        assert_eq!(unchanged, config);
    }

    #[test]
    fn test_load_catalog_default() {
        let config = CliConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.load_catalog().unwrap(), Catalog::sample());
    }

    #[test]
    fn test_load_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id": 7, "name": "B-Sides", "price": 3.49, "image": "bsides.png"}]"#,
        )
        .unwrap();

        let config = CliConfig {
            data_dir: dir.path().to_path_buf(),
            catalog_path: Some(path),
        };
        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_load_catalog_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = CliConfig {
            data_dir: dir.path().to_path_buf(),
            catalog_path: Some(dir.path().join("missing.json")),
        };
        assert!(matches!(
            missing.load_catalog(),
            Err(ConfigError::ReadCatalog { .. })
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[{]").unwrap();
        let invalid = CliConfig {
            data_dir: dir.path().to_path_buf(),
            catalog_path: Some(bad),
        };
        assert!(matches!(
            invalid.load_catalog(),
            Err(ConfigError::Catalog { .. })
        ));
    }
}
