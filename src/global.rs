//! Process-wide logger handle and the facade functions that use it
//!
//! The handle is published with an atomic pointer swap. Each facade call
//! loads the current instance once and uses that snapshot for the whole
//! call; a concurrent [`init`] never mixes sinks of two configurations in
//! one record. A replaced instance is dropped, and therefore flushed, once
//! the last in-flight call releases it.

use crate::config::LoggerConfig;
use crate::core::{
    error::Result,
    log_context::LogContext,
    log_level::LogLevel,
    logger::Logger,
    metrics::MetricsSnapshot,
};
use arc_swap::ArcSwapOption;
use std::sync::Arc;

static GLOBAL: ArcSwapOption<Logger> = ArcSwapOption::const_empty();

const UNINITIALIZED: &str =
    "tee_logger used before initialization: call tee_logger::global::init first";

/// Build a logger from `cfg` and publish it
///
/// On error the previously published logger stays active.
pub fn init(cfg: LoggerConfig) -> Result<()> {
    let logger = Logger::from_config(&cfg)?;
    GLOBAL.store(Some(Arc::new(logger)));
    Ok(())
}

/// [`init`] with [`LoggerConfig::production`]
pub fn init_production(file_path: &str) -> Result<()> {
    init(LoggerConfig::production(file_path))
}

/// Publish a programmatically built logger, returning the one it replaced
pub fn set_logger(logger: Logger) -> Option<Arc<Logger>> {
    GLOBAL.swap(Some(Arc::new(logger)))
}

pub fn is_initialized() -> bool {
    GLOBAL.load().is_some()
}

/// Currently published logger, if any
pub fn current() -> Option<Arc<Logger>> {
    GLOBAL.load_full()
}

/// Delivery counters of the currently published logger
pub fn metrics() -> Option<MetricsSnapshot> {
    GLOBAL.load().as_deref().map(|logger| logger.metrics().snapshot())
}

/// Flush the currently published logger
///
/// # Panics
///
/// If no logger has been published.
#[track_caller]
pub fn sync() -> Result<()> {
    let guard = GLOBAL.load();
    match guard.as_deref() {
        Some(logger) => logger.sync(),
        None => panic!("{}", UNINITIALIZED),
    }
}

#[track_caller]
fn log(level: LogLevel, message: &str, fields: LogContext) {
    let guard = GLOBAL.load();
    match guard.as_deref() {
        Some(logger) => logger.log(level, message, fields),
        None => panic!("{}", UNINITIALIZED),
    }
}

#[track_caller]
pub fn debug(message: impl AsRef<str>, fields: LogContext) {
    log(LogLevel::Debug, message.as_ref(), fields);
}

#[track_caller]
pub fn info(message: impl AsRef<str>, fields: LogContext) {
    log(LogLevel::Info, message.as_ref(), fields);
}

#[track_caller]
pub fn warn(message: impl AsRef<str>, fields: LogContext) {
    log(LogLevel::Warn, message.as_ref(), fields);
}

#[track_caller]
pub fn error(message: impl AsRef<str>, fields: LogContext) {
    log(LogLevel::Error, message.as_ref(), fields);
}

/// Log at FATAL through every sink, flush, and exit with status 1
#[track_caller]
pub fn fatal(message: impl AsRef<str>, fields: LogContext) -> ! {
    match current() {
        Some(logger) => logger.fatal(message, fields),
        None => panic!("{}", UNINITIALIZED),
    }
}
