//! Configuration types for the Quarry core library

use crate::search::TrackTotalHits;
use crate::{QuarryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Prefix of environment variables overriding configuration
pub const ENV_PREFIX: &str = "QUARRY";

/// Search types the engine understands
pub const SEARCH_TYPES: [&str; 2] = ["query_then_fetch", "dfs_query_then_fetch"];

/// Log output formats accepted by [`crate::init_logging_with_config`]
pub const LOG_FORMATS: [&str; 4] = ["json", "text", "pretty", "compact"];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuarryConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Options applied to every search built with
    /// [`crate::search::SearchParameters::from_defaults`]
    #[serde(default)]
    pub defaults: SearchDefaults,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format (json, text, pretty, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Default search options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchDefaults {
    /// Indices to search
    #[serde(default)]
    pub indices: Vec<String>,
    /// Routing values
    #[serde(default)]
    pub routing: Vec<String>,
    /// Shard copy preference
    #[serde(default)]
    pub preference: Option<String>,
    /// Search type
    #[serde(default)]
    pub search_type: Option<String>,
    /// Number of hits to return
    #[serde(default)]
    pub size: Option<u64>,
    /// How accurately to count total hits
    #[serde(default)]
    pub track_total_hits: Option<TrackTotalHits>,
}

impl QuarryConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        // Try YAML first, then JSON
        match serde_yaml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(_) => {
                let config = serde_json::from_str(&content)?;
                Ok(config)
            }
        }
    }

    /// Load configuration from defaults, an optional file and the environment
    ///
    /// Environment variables are named `QUARRY__<SECTION>__<KEY>`, e.g.
    /// `QUARRY__DEFAULTS__SIZE=50`. List values are comma separated.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path.as_ref()));
        }

        let config: Self = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("defaults.indices")
                    .with_list_parse_key("defaults.routing"),
            )
            .build()?
            .try_deserialize()?;

        tracing::debug!(
            level = %config.logging.level,
            format = %config.logging.format,
            "Loaded configuration"
        );

        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if tracing::Level::from_str(&self.logging.level).is_err() {
            return Err(QuarryError::validation(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(QuarryError::validation(format!(
                "Unknown log format: {}",
                self.logging.format
            )));
        }

        if self.defaults.size == Some(0) {
            return Err(QuarryError::validation(
                "Default size must be greater than 0",
            ));
        }

        if let Some(ref search_type) = self.defaults.search_type {
            if !SEARCH_TYPES.contains(&search_type.as_str()) {
                return Err(QuarryError::validation(format!(
                    "Unknown search type: {}",
                    search_type
                )));
            }
        }

        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = QuarryConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
        assert!(config.defaults.indices.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = QuarryConfig::default();
        config.defaults.indices = vec!["books".to_string()];
        config.defaults.track_total_hits = Some(TrackTotalHits::UpTo(1000));

        let yaml = serde_yaml::to_string(&config).unwrap();
        let deserialized: QuarryConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_config_validation() {
        let mut config = QuarryConfig::default();

        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
        config.logging.format = "compact".to_string();

        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
        config.logging.level = "debug".to_string();

        config.defaults.size = Some(0);
        assert!(config.validate().is_err());
        config.defaults.size = Some(10);

        config.defaults.search_type = Some("scan".to_string());
        assert!(config.validate().is_err());
        config.defaults.search_type = Some("dfs_query_then_fetch".to_string());

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_io() {
        let mut config = QuarryConfig::default();
        config.defaults.routing = vec!["user-1".to_string()];
        let temp_file = NamedTempFile::new().unwrap();

        config.to_file(temp_file.path()).unwrap();

        let loaded_config = QuarryConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config, loaded_config);
    }

    #[test]
    fn test_json_file_fallback() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"{{"defaults": {{"indices": ["a", "b"], "track_total_hits": false}}}}"#
        )
        .unwrap();

        let config = QuarryConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.defaults.indices, vec!["a", "b"]);
        assert_eq!(
            config.defaults.track_total_hits,
            Some(TrackTotalHits::Enabled(false))
        );
        assert_eq!(config.logging, LoggingConfig::default());
    }
}
