//! Subcommand implementations.

pub mod assemble;
pub mod build;
pub mod check;
pub mod config_cmd;
pub mod init;

use amalgam_config::{AmalgamConfig, ConfigError};
use std::path::{Path, PathBuf};

/// The config file a command should use.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(AmalgamConfig::config_path)
}

/// Load the configuration.
///
/// The default `./amalgam.toml` may be absent (defaults apply), but a path
/// passed with `--config` must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<AmalgamConfig, ConfigError> {
    match explicit {
        Some(path) if !path.exists() => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: "file not found".into(),
        }),
        Some(path) => AmalgamConfig::load_at(path),
        None => AmalgamConfig::load(),
    }
}
