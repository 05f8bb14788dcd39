//! # Migrator Configuration
//!
//! Settings come from an optional TOML file overlaid with `FCM__`-prefixed environment
//! variables. Nested keys use double underscores: `FCM__EXPORT__COMPRESSION=stored` maps to
//! `export.compression`.

use crate::error::{FcmError, FcmErrorExt};
use ::config::{Config, Environment, File};
use fcm_container::Compression;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File read when no explicit path is given. Its absence is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "fcstd-migrate.toml";
/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FCM";

/// Top-level migrator configuration.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MigratorConfig {
    pub logging: LoggingConfig,
    pub migrations: MigrationsConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Directory for rolling log files. Console only when unset.
    pub directory: Option<PathBuf>,
    pub json: bool,
    pub max_files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MigrationsConfig {
    /// Discovery root inside the built-in catalog.
    pub root: PathBuf,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Compression of the two rewritten XML parts.
    pub compression: Compression,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false, max_files: 5 }
    }
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self { root: PathBuf::from(fcm_migrations::DEFAULT_ROOT) }
    }
}

/// Loads `T` from a configuration file layered under environment overrides.
///
/// An explicit `path` must exist; without one, [`DEFAULT_CONFIG_FILE`] in the working directory
/// is read when present.
///
/// # Errors
/// [`FcmError::Config`] when the explicit file is missing, a source is malformed, or the merged
/// values do not fit `T`.
///
/// # Example
/// ```rust,no_run
/// use fcm::config::{MigratorConfig, load_config};
///
/// let config: MigratorConfig = load_config(None::<&str>).unwrap_or_default();
/// assert_eq!(config.logging.max_files, 5);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, FcmError>
where
    T: DeserializeOwned,
{
    let (file, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    debug!(path = %file.display(), required, "Loading configuration");

    Config::builder()
        .add_source(File::from(file.as_path()).required(required))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true))
        .build()
        .context(format!("Reading {}", file.display()))?
        .try_deserialize::<T>()
        .context("Deserializing configuration")
}
