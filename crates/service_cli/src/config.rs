//! CLI configuration management.
//!
//! Loads the study configuration from a TOML file and applies
//! `ASIAN_PDE_*` environment variable overrides.

use asian_schemes::driver::StudyConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration error type
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(String),

    /// Validation errors
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Full CLI configuration: output settings plus the study itself
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory receiving CSV tables and the JSON summary
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Also write the clamped/windowed presentation tables
    #[serde(default = "default_write_bounded")]
    pub write_bounded: bool,

    /// Study definition
    #[serde(flatten)]
    pub study: StudyConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_write_bounded() -> bool {
    true
}

impl CliConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Apply environment variable overrides
    pub fn with_env_override(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Recognised keys: `ASIAN_PDE_LOG_LEVEL`, `ASIAN_PDE_OUTPUT_DIR`,
    /// `ASIAN_PDE_PARALLEL`, `ASIAN_PDE_PARALLEL_FILL`. Unparseable boolean
    /// values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(level) = lookup("ASIAN_PDE_LOG_LEVEL") {
            self.log_level = level;
        }

        if let Some(dir) = lookup("ASIAN_PDE_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }

        if let Some(parallel) = lookup("ASIAN_PDE_PARALLEL").and_then(|v| parse_bool(&v)) {
            self.study.parallel = parallel;
        }

        if let Some(fill) = lookup("ASIAN_PDE_PARALLEL_FILL").and_then(|v| parse_bool(&v)) {
            self.study.parallel_fill = fill;
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        if self.output_dir.as_os_str().is_empty() {
            errors.push("output_dir cannot be empty".to_string());
        }

        if let Err(e) = self.study.validate() {
            // Strip the "Configuration error: " prefix, the list is already labelled
            let msg = match e {
                asian_core::types::SchemeError::Configuration(msg) => msg,
                other => other.to_string(),
            };
            errors.extend(msg.split("; ").map(str::to_string));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from file with environment overrides and validate
    pub fn load_with_env_and_validate(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?.with_env_override();
        config.validate()?;
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
