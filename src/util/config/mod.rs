//! Pcore configuration
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. Environment variables (PCORE_NAME_AUTHORITY, PCORE_CASE_INSENSITIVE, PCORE_LOG)
//! 2. JSON configuration file
//! 3. Default values
//! ```
//!
//! # Usage
//!
//! ```rust
//! use pcore::util::config::PcoreConfig;
//!
//! let config = PcoreConfig::default().with_env_overrides();
//! assert!(config.case_insensitive_lookup);
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::util::logger::LogLevel;

/// Name authority used for everything that is not declared by a TypeSet
pub const RUNTIME_NAME_AUTHORITY: &str = "http://puppet.com/2016.1/runtime";

/// Runtime configuration for a [`crate::Pcore`] context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcoreConfig {
    /// Name authority of the boot loader
    #[serde(default = "default_name_authority")]
    pub name_authority: String,
    /// Whether type names may be found by case-insensitive fallback
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive_lookup: bool,
    /// Log level used by [`crate::util::logger::init_from_config`]
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_name_authority() -> String {
    RUNTIME_NAME_AUTHORITY.to_string()
}

fn default_case_insensitive() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PcoreConfig {
    fn default() -> Self {
        Self {
            name_authority: RUNTIME_NAME_AUTHORITY.to_string(),
            case_insensitive_lookup: true,
            log_level: "info".to_string(),
        }
    }
}

impl PcoreConfig {
    /// Load a JSON configuration file. Missing keys take their default.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: PcoreConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Defaults overridden by the environment
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides on top of this configuration
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        if let Some(authority) = lookup("PCORE_NAME_AUTHORITY") {
            if !authority.is_empty() {
                self.name_authority = authority;
            }
        }
        if let Some(flag) = lookup("PCORE_CASE_INSENSITIVE") {
            match flag.to_ascii_lowercase().as_str() {
                "0" | "false" | "no" | "off" => self.case_insensitive_lookup = false,
                "1" | "true" | "yes" | "on" => self.case_insensitive_lookup = true,
                _ => {}
            }
        }
        if let Some(level) = lookup("PCORE_LOG") {
            if LogLevel::parse(&level).is_some() {
                self.log_level = level.to_ascii_lowercase();
            }
        }
        self
    }

    /// The configured log level, `Info` when the setting is not recognized
    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.log_level).unwrap_or(LogLevel::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PcoreConfig::default();
        assert_eq!(config.name_authority, RUNTIME_NAME_AUTHORITY);
        assert!(config.case_insensitive_lookup);
        assert_eq!(config.log_level(), LogLevel::Info);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "case_insensitive_lookup": false }}"#).unwrap();
        let config = PcoreConfig::load(file.path()).unwrap();
        assert!(!config.case_insensitive_lookup);
        assert_eq!(config.name_authority, RUNTIME_NAME_AUTHORITY);
    }

    #[test]
    fn test_load_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = PcoreConfig::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("PCORE_NAME_AUTHORITY", "http://example.com/types"),
            ("PCORE_CASE_INSENSITIVE", "off"),
            ("PCORE_LOG", "DEBUG"),
        ]
        .into_iter()
        .collect();
        let config =
            PcoreConfig::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.name_authority, "http://example.com/types");
        assert!(!config.case_insensitive_lookup);
        assert_eq!(config.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_unknown_log_level_is_ignored() {
        let config = PcoreConfig::default().with_overrides(|k| {
            (k == "PCORE_LOG").then(|| "chatty".to_string())
        });
        assert_eq!(config.log_level, "info");
    }
}
