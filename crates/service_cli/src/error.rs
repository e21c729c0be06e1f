//! CLI error types

use asian_core::types::SchemeError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or validated
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The study layout was rejected by the engine
    #[error("Study error: {0}")]
    Scheme(#[from] SchemeError),

    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON output failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Some runs of the study failed
    #[error("{failed} of {total} runs failed")]
    RunsFailed {
        /// Number of failed runs
        failed: usize,
        /// Number of planned runs
        total: usize,
    },
}

/// Result alias for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;
