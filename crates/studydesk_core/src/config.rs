//! Application configuration.
//!
//! Parsed from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! [store]
//! task_latency_ms = 300
//! subject_latency_ms = 200
//! seed_path = "data/seed.json"
//!
//! [clock]
//! utc_offset_minutes = 60
//!
//! [logging]
//! level = "info"
//! dir = "/var/log/studydesk"
//! ```

use crate::clock::offset_from_minutes;
use crate::logging::{default_log_level, normalize_level};
use crate::store::memory::{DEFAULT_SUBJECT_LATENCY, DEFAULT_TASK_LATENCY};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest accepted distance from UTC, in minutes.
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Configuration loading and validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    InvalidUtcOffset(i32),
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed config: {err}"),
            Self::InvalidUtcOffset(minutes) => write!(
                f,
                "utc_offset_minutes {minutes} is outside ±{MAX_UTC_OFFSET_MINUTES}"
            ),
            Self::InvalidLogLevel(message) => f.write_str(message),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidUtcOffset(_) | Self::InvalidLogLevel(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_task_latency_ms")]
    pub task_latency_ms: u64,
    #[serde(default = "default_subject_latency_ms")]
    pub subject_latency_ms: u64,
    /// JSON seed file; the built-in dataset is used when absent.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            task_latency_ms: default_task_latency_ms(),
            subject_latency_ms: default_subject_latency_ms(),
            seed_path: None,
        }
    }
}

impl StoreConfig {
    pub fn task_latency(&self) -> Duration {
        Duration::from_millis(self.task_latency_ms)
    }

    pub fn subject_latency(&self) -> Duration {
        Duration::from_millis(self.subject_latency_ms)
    }
}

fn default_task_latency_ms() -> u64 {
    DEFAULT_TASK_LATENCY.as_millis() as u64
}

fn default_subject_latency_ms() -> u64 {
    DEFAULT_SUBJECT_LATENCY.as_millis() as u64
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Local offset used for calendar-day predicates.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl ClockConfig {
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::InvalidUtcOffset(self.utc_offset_minutes));
        }
        offset_from_minutes(self.utc_offset_minutes)
            .ok_or(ConfigError::InvalidUtcOffset(self.utc_offset_minutes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level_string")]
    pub level: String,
    /// Rolling log directory; logs go to stderr when absent.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level_string(),
            dir: None,
        }
    }
}

fn default_level_string() -> String {
    default_log_level().to_string()
}

impl AppConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Loads `path` when given, otherwise returns defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clock.offset()?;
        normalize_level(&self.logging.level).map_err(ConfigError::InvalidLogLevel)?;
        Ok(())
    }
}
