//! Configuration loader for faultline
//!
//! Layers a JSON document (inline or from disk) and environment overrides on
//! top of the defaults, then validates the result.

use crate::config::RecoveryConfig;
use faultline_core::{
    constants::{
        FAULTLINE_FAILURE_THRESHOLD_VAR, FAULTLINE_HISTORY_CAPACITY_VAR, FAULTLINE_OPEN_TIMEOUT_VAR,
        FAULTLINE_PARALLEL_VAR,
    },
    Error, Result,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;

impl RecoveryConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RecoveryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system(path, "read", e))?;
        Self::from_json_str(&contents)
    }

    /// Apply `FAULTLINE_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(FAULTLINE_FAILURE_THRESHOLD_VAR) {
            self.failure_threshold = parse_var(FAULTLINE_FAILURE_THRESHOLD_VAR, &value)?;
        }
        if let Some(value) = lookup(FAULTLINE_OPEN_TIMEOUT_VAR) {
            self.open_timeout_secs = parse_var(FAULTLINE_OPEN_TIMEOUT_VAR, &value)?;
        }
        if let Some(value) = lookup(FAULTLINE_HISTORY_CAPACITY_VAR) {
            self.history_capacity = parse_var(FAULTLINE_HISTORY_CAPACITY_VAR, &value)?;
        }
        if let Some(value) = lookup(FAULTLINE_PARALLEL_VAR) {
            self.parallel_orchestration = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(Error::configuration(format!(
                        "{FAULTLINE_PARALLEL_VAR} expects a boolean, got '{other}'"
                    )))
                }
            };
        }
        self.validate()
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::configuration(format!("{name} has an invalid value '{value}'"))
    })
}

/// Configuration loader that assembles a `RecoveryConfig` at startup
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Optional JSON file to read
    file: Option<PathBuf>,
    /// Optional inline JSON, applied instead of the file when both are set
    inline: Option<String>,
    /// Whether to apply environment overrides
    use_env: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Load from inline JSON
    pub fn json(mut self, json: impl Into<String>) -> Self {
        self.inline = Some(json.into());
        self
    }

    /// Set whether to apply `FAULTLINE_*` environment overrides
    pub fn with_env(mut self, use_env: bool) -> Self {
        self.use_env = use_env;
        self
    }

    /// Load the configuration
    pub fn load(self) -> Result<RecoveryConfig> {
        let mut config = match (&self.inline, &self.file) {
            (Some(json), _) => RecoveryConfig::from_json_str(json)?,
            (None, Some(path)) => RecoveryConfig::from_file(path)?,
            (None, None) => RecoveryConfig::default(),
        };

        if self.use_env {
            config.apply_env_overrides()?;
        }

        tracing::debug!(
            failure_threshold = config.failure_threshold,
            open_timeout_secs = config.open_timeout_secs,
            services = config.dependencies.len(),
            "Loaded recovery configuration"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RecoveryConfig::from_json_str(
            r#"{
                "failure_threshold": 2,
                "dependencies": { "frontend": ["api", "cdn"], "api": ["database"] }
            }"#,
        )
        .unwrap();

        assert_eq!(config.failure_threshold, 2);
        assert_eq!(config.open_timeout_secs, 60);
        assert_eq!(config.dependencies["frontend"].len(), 2);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = RecoveryConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "history_capacity": 16, "parallel_orchestration": true }}"#).unwrap();

        let config = RecoveryConfig::from_file(file.path()).unwrap();
        assert_eq!(config.history_capacity, 16);
        assert!(config.parallel_orchestration);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = RecoveryConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (FAULTLINE_FAILURE_THRESHOLD_VAR, "3"),
            (FAULTLINE_OPEN_TIMEOUT_VAR, "5"),
            (FAULTLINE_PARALLEL_VAR, "yes"),
        ]
        .into_iter()
        .collect();

        let mut config = RecoveryConfig::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| (*v).to_string()))
            .unwrap();

        assert_eq!(config.failure_threshold, 3);
        assert_eq!(config.open_timeout_secs, 5);
        assert!(config.parallel_orchestration);
        assert_eq!(config.history_capacity, 1000);
    }

    #[test]
    fn test_override_rejects_garbage() {
        let mut config = RecoveryConfig::default();
        let err = config
            .apply_overrides(|name| {
                (name == FAULTLINE_FAILURE_THRESHOLD_VAR).then(|| "lots".to_string())
            })
            .unwrap_err();
        assert!(err.to_string().contains(FAULTLINE_FAILURE_THRESHOLD_VAR));
    }

    #[test]
    fn test_loader_prefers_inline_json() {
        let config = ConfigLoader::new()
            .file("/ignored.json")
            .json(r#"{ "retry_pause_ms": 10 }"#)
            .load()
            .unwrap();
        assert_eq!(config.retry_pause_ms, 10);
    }

    #[test]
    fn test_loader_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, RecoveryConfig::default());
    }
}
