//! Core logger types

pub mod encoder;
pub mod error;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod tee;
pub mod timestamp;

pub use encoder::Encoder;
pub use error::{LoggerError, Result};
pub use log_context::{FieldValue, LogContext};
pub use log_entry::{Caller, LogEntry};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use metrics::{LoggerMetrics, MetricsSnapshot};
pub use tee::{SinkCore, Tee};
pub use timestamp::TimestampFormat;
