//! Runtime configuration for shop processes.
//!
//! Values come from environment variables with built-in defaults:
//!
//! | variable            | field       | default                    |
//! |---------------------|-------------|----------------------------|
//! | `ARTISAN_DB_PATH`   | `db_path`   | `artisan.db`               |
//! | `ARTISAN_LOG_LEVEL` | `log_level` | build-mode default level   |
//! | `ARTISAN_LOG_DIR`   | `log_dir`   | unset (file logging off)   |

use crate::logging::{default_log_level, normalize_level, LoggingError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ARTISAN_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "ARTISAN_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "ARTISAN_LOG_DIR";

const DEFAULT_DB_PATH: &str = "artisan.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// SQLite database file holding the `clients` table.
    pub db_path: PathBuf,
    /// Normalized level name (trace|debug|info|warn|error).
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logging.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyValue(&'static str),
    InvalidLogLevel(LoggingError),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValue(name) => write!(f, "`{name}` is set but empty"),
            Self::InvalidLogLevel(err) => write!(f, "`{LOG_LEVEL_ENV}`: {err}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "`{LOG_DIR_ENV}` must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLogLevel(err) => Some(err),
            Self::EmptyValue(_) | Self::RelativeLogDir(_) => None,
        }
    }
}

impl ShopConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, applying defaults for unset names.
    ///
    /// # Errors
    /// - `EmptyValue` when a variable is set to an empty string.
    /// - `InvalidLogLevel` for unknown level names.
    /// - `RelativeLogDir` when the log directory is not absolute.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = non_empty(&lookup, DB_PATH_ENV)? {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_empty(&lookup, LOG_LEVEL_ENV)? {
            config.log_level = normalize_level(&level)
                .map_err(ConfigError::InvalidLogLevel)?
                .to_string();
        }
        if let Some(dir) = non_empty(&lookup, LOG_DIR_ENV)? {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir));
            }
            config.log_dir = Some(dir);
        }

        Ok(config)
    }
}

fn non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<String>, ConfigError> {
    match lookup(name) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue(name)),
        other => Ok(other),
    }
}
