//! Composed logger instance

use super::{
    error::Result,
    log_context::LogContext,
    log_entry::{Caller, LogEntry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    tee::{SinkCore, Tee},
};
use crate::config::LoggerConfig;
use std::panic::Location;

/// Exit status used by [`Logger::fatal`]
pub const FATAL_EXIT_CODE: i32 = 1;

/// One immutable, fully composed logger
///
/// Instances are published through the global handle in [`crate::global`]
/// but can also be used directly.
pub struct Logger {
    tee: Tee,
    stacktrace_level: LogLevel,
    add_caller: bool,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Validate `cfg` and build every sink it describes
    ///
    /// # Errors
    ///
    /// Configuration errors and sink construction errors; no partially
    /// built logger is ever returned.
    pub fn from_config(cfg: &LoggerConfig) -> Result<Self> {
        cfg.validate()?;
        let tee = Tee::from_config(cfg)?;
        Ok(LoggerBuilder::new().tee(tee).build())
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use tee_logger::prelude::*;
    /// use tee_logger::appenders::build_console_sink;
    ///
    /// let logger = Logger::builder()
    ///     .core(build_console_sink())
    ///     .stacktrace_level(LogLevel::Fatal)
    ///     .build();
    /// logger.info("ready", LogContext::new());
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Log at `level`, attributing the record to the calling location
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>, fields: LogContext) {
        let caller = self.add_caller.then(|| Caller::from(Location::caller()));
        self.log_at(level, message, fields, caller);
    }

    /// Log with an explicit caller location (used by forwarding layers)
    pub fn log_at(
        &self,
        level: LogLevel,
        message: impl AsRef<str>,
        fields: LogContext,
        caller: Option<Caller>,
    ) {
        if !self.tee.enabled(level) {
            return;
        }

        let mut entry = LogEntry::new(level, message).with_fields(fields);
        if let Some(caller) = caller {
            entry = entry.with_caller(caller);
        }
        if level >= self.stacktrace_level {
            entry = entry.with_captured_stacktrace();
        }

        self.tee.write(&entry, &self.metrics);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>, fields: LogContext) {
        self.log(LogLevel::Debug, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>, fields: LogContext) {
        self.log(LogLevel::Info, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>, fields: LogContext) {
        self.log(LogLevel::Warn, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>, fields: LogContext) {
        self.log(LogLevel::Error, message, fields);
    }

    /// Log at FATAL, flush every sink, and exit the process with status 1
    ///
    /// Write and flush failures are reported but never prevent the exit.
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>, fields: LogContext) -> ! {
        self.log(LogLevel::Fatal, message, fields);
        if let Err(e) = self.sync() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        std::process::exit(FATAL_EXIT_CODE)
    }

    /// Flush all buffered output of every sink
    pub fn sync(&self) -> Result<()> {
        self.tee.sync()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn tee(&self) -> &Tee {
        &self.tee
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.tee.sync() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let failures = self.metrics.write_failures();
        if failures > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} failed writes (failure rate: {:.2}%)",
                failures,
                self.metrics.failure_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
pub struct LoggerBuilder {
    cores: Vec<SinkCore>,
    stacktrace_level: LogLevel,
    add_caller: bool,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            cores: Vec::new(),
            stacktrace_level: LogLevel::Error,
            add_caller: true,
        }
    }

    /// Add a sink core; records reach cores in the order they were added
    #[must_use = "builder methods return a new value"]
    pub fn core(mut self, core: SinkCore) -> Self {
        self.cores.push(core);
        self
    }

    /// Append all cores of an already composed tee
    #[must_use = "builder methods return a new value"]
    pub fn tee(mut self, tee: Tee) -> Self {
        self.cores.extend(tee.into_cores());
        self
    }

    /// Lowest level that gets a stack trace attached (default ERROR)
    #[must_use = "builder methods return a new value"]
    pub fn stacktrace_level(mut self, level: LogLevel) -> Self {
        self.stacktrace_level = level;
        self
    }

    /// Whether records carry the caller's file and line (default true)
    #[must_use = "builder methods return a new value"]
    pub fn add_caller(mut self, enabled: bool) -> Self {
        self.add_caller = enabled;
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            tee: Tee::compose(self.cores),
            stacktrace_level: self.stacktrace_level,
            add_caller: self.add_caller,
            metrics: LoggerMetrics::new(),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
