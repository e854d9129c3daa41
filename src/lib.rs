//! # Tee Logger
//!
//! A process-wide structured logging facade. One configuration produces a
//! console sink and an optional size-rotated file sink; every record goes
//! synchronously to each sink whose minimum level it meets.
//!
//! ## Features
//!
//! - **Tee Output**: Colorized console text at DEBUG plus JSON lines in a file
//! - **Rotation**: Size-based rollover with backup count, age limit and gzip
//! - **Hot Replacement**: `init` atomically swaps the global logger
//! - **Structured Fields**: Typed key/value pairs with every record
//!
//! ## Quick Start
//!
//! ```no_run
//! use tee_logger::prelude::*;
//! use tee_logger::{error, info};
//!
//! tee_logger::global::init_production("logs/api.log").unwrap();
//!
//! info!("port" => 8080; "Server started");
//! error!("code" => 500; "Request failed");
//!
//! tee_logger::global::sync().unwrap();
//! ```

pub mod appenders;
pub mod config;
pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::config::{FileLogConfig, LoggerConfig};
    pub use crate::core::{
        FieldValue, LogContext, LogLevel, Logger, LoggerBuilder, LoggerError, Result,
    };
}

pub use config::{FileLogConfig, LoggerConfig};
pub use core::{
    Caller, Encoder, FieldValue, LogContext, LogEntry, LogLevel, Logger, LoggerBuilder,
    LoggerError, LoggerMetrics, MetricsSnapshot, Result, SinkCore, Tee, TimestampFormat,
};
