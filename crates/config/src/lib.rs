//! Configuration loading and validation for amalgam.
//!
//! Loads `amalgam.toml` from the working directory with environment variable
//! overrides. Each `[[library]]` table describes one single-header artifact;
//! top-level keys supply defaults for every library.
//!
//! Precedence, lowest to highest: built-in defaults, top-level keys,
//! per-library keys, environment variables. An environment override applies
//! to every library, including ones that set the key themselves.
//!
//! All relative paths resolve against the working directory, not the
//! config file's location.

use amalgam_core::{AssemblyPlan, LibraryName, WriteMode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "amalgam.toml";

/// Environment overrides.
pub const ENV_OUTPUT_DIR: &str = "AMALGAM_OUTPUT_DIR";
pub const ENV_LICENSE: &str = "AMALGAM_LICENSE";
pub const ENV_WRITE_MODE: &str = "AMALGAM_WRITE_MODE";

/// The root configuration structure.
///
/// Maps directly to `amalgam.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmalgamConfig {
    /// Directory artifacts are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// License file appended to every artifact
    #[serde(default = "default_license")]
    pub license: PathBuf,

    /// How artifacts reach disk
    #[serde(default)]
    pub write_mode: WriteMode,

    /// Libraries to assemble, in build order
    #[serde(default, rename = "library")]
    pub libraries: Vec<LibraryConfig>,
}

/// One `[[library]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub name: String,

    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    pub header: String,

    /// Implementation files in output order. Each file's first line is dropped.
    #[serde(default)]
    pub sources: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_mode: Option<WriteMode>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_license() -> PathBuf {
    PathBuf::from(amalgam_core::plan::DEFAULT_LICENSE)
}
fn default_source_dir() -> PathBuf {
    PathBuf::from("src")
}

impl Default for AmalgamConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            license: default_license(),
            write_mode: WriteMode::default(),
            libraries: vec![],
        }
    }
}

impl LibraryConfig {
    /// Resolve this library against the global defaults.
    pub fn plan(&self, config: &AmalgamConfig) -> AssemblyPlan {
        AssemblyPlan::new(
            LibraryName::new(self.name.clone()),
            self.source_dir.clone(),
            self.header.clone(),
            self.sources.iter().cloned(),
        )
        .with_license(self.license.clone().unwrap_or_else(|| config.license.clone()))
        .with_output_dir(
            self.output_dir
                .clone()
                .unwrap_or_else(|| config.output_dir.clone()),
        )
        .with_write_mode(self.write_mode.unwrap_or(config.write_mode))
    }
}

impl AmalgamConfig {
    /// Load configuration from `./amalgam.toml`.
    ///
    /// Also checks environment variables:
    /// - `AMALGAM_OUTPUT_DIR`
    /// - `AMALGAM_LICENSE`
    /// - `AMALGAM_WRITE_MODE` (`stream` or `atomic`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_at(&Self::config_path())
    }

    /// Load configuration from `path`, then apply environment overrides.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::ParseError { reason, .. } => ConfigError::ParseError {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        tracing::debug!(
            path = %path.display(),
            libraries = config.libraries.len(),
            "Config loaded"
        );
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from(CONFIG_FILE),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// An override replaces the top-level value and clears the matching
    /// per-library key, so it reaches every library.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
            self.libraries.iter_mut().for_each(|l| l.output_dir = None);
        }

        if let Some(license) = lookup(ENV_LICENSE) {
            self.license = PathBuf::from(license);
            self.libraries.iter_mut().for_each(|l| l.license = None);
        }

        if let Some(mode) = lookup(ENV_WRITE_MODE) {
            self.write_mode = mode.parse().map_err(|reason: String| {
                ConfigError::ValidationError(format!("{ENV_WRITE_MODE}: {reason}"))
            })?;
            self.libraries.iter_mut().for_each(|l| l.write_mode = None);
        }

        Ok(())
    }

    /// Path of the default config file.
    pub fn config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE)
    }

    /// Validate the configuration.
    ///
    /// Library names are only checked for presence and uniqueness; whether
    /// they make valid file names or macro tokens is left to the filesystem.
    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();

        for lib in &self.libraries {
            if lib.name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "library name must not be empty".into(),
                ));
            }

            if !seen.insert(lib.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "library '{}' is defined more than once",
                    lib.name
                )));
            }

            if lib.header.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "library '{}' has an empty header",
                    lib.name
                )));
            }
        }

        Ok(())
    }

    pub fn library(&self, name: &str) -> Option<&LibraryConfig> {
        self.libraries.iter().find(|l| l.name == name)
    }

    /// Plans for every configured library, in config order.
    pub fn plans(&self) -> Vec<AssemblyPlan> {
        self.libraries.iter().map(|l| l.plan(self)).collect()
    }

    /// Plans for the named libraries, in the order given. An empty selection
    /// means every library.
    pub fn select(&self, names: &[String]) -> Result<Vec<AssemblyPlan>, ConfigError> {
        if names.is_empty() {
            return Ok(self.plans());
        }

        names
            .iter()
            .map(|name| {
                self.library(name)
                    .map(|l| l.plan(self))
                    .ok_or_else(|| ConfigError::UnknownLibrary(name.clone()))
            })
            .collect()
    }

    /// The starter configuration written by `amalgam init`.
    pub fn example() -> Self {
        Self {
            libraries: vec![LibraryConfig {
                name: "minimal".into(),
                source_dir: default_source_dir(),
                header: "minimal.h".into(),
                sources: vec![
                    "minimal.c".into(),
                    "input.c".into(),
                    "event.c".into(),
                    "platform_windows.c".into(),
                ],
                license: None,
                output_dir: None,
                write_mode: None,
            }],
            ..Self::default()
        }
    }

    /// Generate the starter config TOML string (for `init` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::example()).unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No library named '{0}' in configuration")]
    UnknownLibrary(String),
}
