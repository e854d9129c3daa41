//! Logger configuration
//!
//! # Data Flow
//! ```text
//! TOML document / code
//!     → LoggerConfig (serde, defaults for missing keys)
//!     → validate() (semantic checks, ConfigError on failure)
//!     → sink builders
//! ```

use crate::appenders::RotationPolicy;
use crate::core::error::{LoggerError, Result};
use crate::core::log_level::LogLevel;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, MAIN_SEPARATOR};

pub use crate::appenders::rotating_file::DEFAULT_MAX_SIZE_MB;

/// Rotating file output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// Whether a file sink is constructed at all
    pub enabled: bool,
    pub path: String,
    /// Rotation threshold; 0 selects [`DEFAULT_MAX_SIZE_MB`]
    pub max_size_mb: i64,
    /// Rotated files to keep; 0 keeps all
    pub max_backups: i64,
    /// Days before a rotated file is deleted; 0 never expires
    pub max_age_days: i64,
    /// Gzip rotated files
    pub compress: bool,
}

impl Default for FileLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: String::new(),
            max_size_mb: 0,
            max_backups: 0,
            max_age_days: 0,
            compress: false,
        }
    }
}

impl FileLogConfig {
    /// Enabled file output at `path` with default retention
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            enabled: true,
            path: path.into(),
            ..Self::default()
        }
    }

    /// Rotation policy for a validated configuration
    pub fn rotation_policy(&self) -> RotationPolicy {
        let non_negative = |v: i64| u64::try_from(v).unwrap_or(0);
        RotationPolicy::new()
            .with_max_size_mb(non_negative(self.max_size_mb))
            .with_max_backups(usize::try_from(self.max_backups).unwrap_or(0))
            .with_max_age_days(non_negative(self.max_age_days))
            .with_compression(self.compress)
    }
}

/// Minimum level plus file output; console output is always on at DEBUG
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Level name accepted by the file sink, e.g. `"INFO"`
    pub level: String,
    pub file: FileLogConfig,
}

impl Default for LoggerConfig {
    /// INFO level, console only
    fn default() -> Self {
        Self {
            level: LogLevel::Info.to_str().to_string(),
            file: FileLogConfig::default(),
        }
    }
}

impl LoggerConfig {
    /// Production preset: INFO, 512 MB files, unlimited retention, compressed
    /// backups, and today's date in the file name.
    ///
    /// An empty `file_path` disables file output.
    pub fn production(file_path: &str) -> Self {
        Self::production_on(file_path, Local::now().date_naive())
    }

    fn production_on(file_path: &str, date: NaiveDate) -> Self {
        let enabled = !file_path.is_empty();
        let path = if enabled {
            dated_path(file_path, date)
        } else {
            String::new()
        };

        Self {
            level: LogLevel::Info.to_str().to_string(),
            file: FileLogConfig {
                enabled,
                path,
                max_size_mb: DEFAULT_MAX_SIZE_MB as i64,
                max_backups: 0,
                max_age_days: 0,
                compress: true,
            },
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level.to_str().to_string();
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: FileLogConfig) -> Self {
        self.file = file;
        self
    }

    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and validate a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("reading logger configuration", path.display().to_string(), e)
        })?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Minimum level of the file sink, via the level registry
    pub fn min_level(&self) -> LogLevel {
        LogLevel::from_name(&self.level)
    }

    /// Semantic checks run before any sink is built
    pub fn validate(&self) -> Result<()> {
        if self.level.is_empty() {
            return Err(LoggerError::config("level", "missing level name"));
        }

        let file = &self.file;
        if file.enabled && file.path.is_empty() {
            return Err(LoggerError::config("file", "path must not be empty"));
        }
        if file.max_age_days < 0 {
            return Err(LoggerError::config("file", "max_age_days must be greater than or equal to 0"));
        }
        if file.max_backups < 0 {
            return Err(LoggerError::config("file", "max_backups must be greater than or equal to 0"));
        }
        if file.max_size_mb < 0 {
            return Err(LoggerError::config("file", "max_size_mb must be greater than or equal to 0"));
        }

        Ok(())
    }
}

/// Insert `-YYYY-MM-DD` before the extension: `logs/app.log` → `logs/app-2025-01-08.log`.
///
/// A path naming a directory (trailing separator) gets `YYYY-MM-DD.log`
/// inside it; a path without extension gets `.log` appended.
fn dated_path(file_path: &str, date: NaiveDate) -> String {
    let stamp = date.format("%Y-%m-%d");
    if file_path.ends_with('/') || file_path.ends_with(MAIN_SEPARATOR) {
        return format!("{}{}.log", file_path, stamp);
    }

    let path = Path::new(file_path);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let file_name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-{}.{}", stem, stamp, ext),
        None => format!("{}-{}.log", stem, stamp),
    };
    path.with_file_name(file_name).to_string_lossy().into_owned()
}
