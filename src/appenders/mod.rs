//! Output targets and their builders
//!
//! The set of sinks is closed: console and rotating file. Each builder
//! returns a [`SinkCore`] pairing the sink with its encoder and threshold.

pub mod console;
pub mod file;
pub mod rotating_file;

pub use console::ConsoleSink;
pub use file::RotatingFileSink;
pub use rotating_file::{Backup, RotatingFileWriter, RotationPolicy};

use crate::config::FileLogConfig;
use crate::core::encoder::Encoder;
use crate::core::error::{LoggerError, Result};
use crate::core::log_level::LogLevel;
use crate::core::tee::SinkCore;
use std::path::Path;

/// An output destination for encoded records
pub enum Sink {
    Console(ConsoleSink),
    File(RotatingFileSink),
}

impl Sink {
    pub fn name(&self) -> &str {
        match self {
            Sink::Console(_) => "console",
            Sink::File(_) => "file",
        }
    }

    pub fn write(&self, record: &[u8]) -> Result<()> {
        match self {
            Sink::Console(sink) => sink.write(record),
            Sink::File(sink) => sink.write(record),
        }
    }

    pub fn flush(&self) -> Result<()> {
        match self {
            Sink::Console(sink) => sink.flush(),
            Sink::File(sink) => sink.flush(),
        }
    }
}

/// Console output: stdout, colorized text, every level from DEBUG up
pub fn build_console_sink() -> SinkCore {
    SinkCore::new(Sink::Console(ConsoleSink::new()), Encoder::console(), LogLevel::Debug)
}

/// Rotating file output: JSON records at or above `threshold`
///
/// # Errors
///
/// - [`LoggerError::InvalidConfiguration`] if the path is empty or an
///   existing directory
/// - [`LoggerError::SinkConstruction`] if the file cannot be opened
pub fn build_file_sink(cfg: &FileLogConfig, threshold: LogLevel) -> Result<SinkCore> {
    if cfg.path.is_empty() {
        return Err(LoggerError::config("file", "path must not be empty"));
    }

    let path = Path::new(&cfg.path);
    if path.is_dir() {
        return Err(LoggerError::config(
            "file",
            format!("path '{}' is a directory", cfg.path),
        ));
    }

    let sink = RotatingFileSink::new(path, cfg.rotation_policy())?;
    Ok(SinkCore::new(Sink::File(sink), Encoder::json(), threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_console_sink_accepts_everything() {
        let core = build_console_sink();
        assert_eq!(core.threshold(), LogLevel::Debug);
        assert_eq!(core.sink().name(), "console");
        assert!(matches!(core.encoder(), Encoder::Console { use_colors: true, .. }));
    }

    #[test]
    fn test_file_sink_uses_configured_threshold_and_json() {
        let temp_dir = TempDir::new().unwrap();
        let cfg = FileLogConfig::at(temp_dir.path().join("app.log").to_string_lossy());

        let core = build_file_sink(&cfg, LogLevel::Warn).unwrap();
        assert_eq!(core.threshold(), LogLevel::Warn);
        assert_eq!(core.sink().name(), "file");
        assert!(matches!(core.encoder(), Encoder::Json { .. }));
    }

    #[test]
    fn test_file_sink_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        let cfg = FileLogConfig::at(temp_dir.path().to_string_lossy());

        let err = build_file_sink(&cfg, LogLevel::Info).err().unwrap();
        assert!(err.is_config_error());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_sink_open_failure_is_construction_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        // Parent component is a regular file, so the directory cannot be created
        let cfg = FileLogConfig::at(blocker.join("app.log").to_string_lossy());
        let err = build_file_sink(&cfg, LogLevel::Info).err().unwrap();
        assert!(matches!(err, LoggerError::SinkConstruction { .. }));
    }
}
