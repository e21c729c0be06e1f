//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod solve;

use std::path::Path;

use crate::config::CliConfig;
use crate::{CliError, Result};

/// Load, override and validate the configuration at `path`.
pub(crate) fn load_config(path: &Path) -> Result<CliConfig> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    Ok(CliConfig::load_with_env_and_validate(path)?)
}
