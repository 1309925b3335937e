//! Configuration loading for the catalog.
//!
//! Settings come from three layers, later layers overriding earlier ones:
//! built-in defaults, an optional TOML file, and environment variables
//! prefixed `OPENCATALOG_` (nested keys separated by `__`, e.g.
//! `OPENCATALOG_DATASTORE__DEFAULT_FTS_LANG`).

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Activity-stream related settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    /// Gate for the `send_email_notifications` action.
    pub email_notifications: bool,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            email_notifications: false,
        }
    }
}

/// Datastore (tabular storage) settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatastoreConfig {
    /// Language for full-text index expressions when the request does not
    /// name one. Falls back to "english" when unset.
    pub default_fts_lang: Option<String>,
}

/// Top-level catalog configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Name of the site user that owns system-initiated changes.
    pub site_id: String,
    pub activity: ActivityConfig,
    pub datastore: DatastoreConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            site_id: "default".to_string(),
            activity: ActivityConfig::default(),
            datastore: DatastoreConfig::default(),
        }
    }
}

impl CatalogConfig {
    /// Loads configuration from an optional TOML file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("OPENCATALOG")
                .separator("__")
                .try_parsing(true),
        );
        let cfg = builder.build()?;
        Ok(cfg.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = CatalogConfig::default();
        assert_eq!(cfg.site_id, "default");
        assert!(!cfg.activity.email_notifications);
        assert!(cfg.datastore.default_fts_lang.is_none());
    }

    #[test]
    fn test_load_without_file_yields_defaults() {
        let cfg = CatalogConfig::load(None).unwrap();
        assert_eq!(cfg, CatalogConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
site_id = "demo"

[activity]
email_notifications = true

[datastore]
default_fts_lang = "simple"
"#
        )
        .unwrap();

        let cfg = CatalogConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.site_id, "demo");
        assert!(cfg.activity.email_notifications);
        assert_eq!(cfg.datastore.default_fts_lang.as_deref(), Some("simple"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "site_id = \"partial\"").unwrap();

        let cfg = CatalogConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.site_id, "partial");
        assert!(!cfg.activity.email_notifications);
    }
}
