//! Logging macros for the process-wide logger.
//!
//! Each macro formats its message like `format!` and forwards to the
//! matching function in [`crate::global`]. Structured fields go before a
//! `;` as `"key" => value` pairs.
//!
//! # Examples
//!
//! ```
//! use tee_logger::prelude::*;
//! use tee_logger::{info, warn};
//!
//! tee_logger::global::init(LoggerConfig::default()).unwrap();
//!
//! // Basic logging
//! info!("Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!("Server listening on port {}", port);
//!
//! // With fields
//! let user_id = 42;
//! warn!("user_id" => user_id, "action" => "login"; "Slow login for user {}", user_id);
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __facade_call {
    ($func:ident, $($key:literal => $value:expr),+ $(,)? ; $($arg:tt)+) => {
        $crate::global::$func(
            ::std::format!($($arg)+),
            $crate::LogContext::new()$(.with_field($key, $value))+,
        )
    };
    ($func:ident, $($arg:tt)+) => {
        $crate::global::$func(::std::format!($($arg)+), $crate::LogContext::new())
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # tee_logger::global::init(tee_logger::LoggerConfig::default()).unwrap();
/// use tee_logger::debug;
/// debug!("Debug information");
/// debug!("attempt" => 2; "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::__facade_call!(debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # tee_logger::global::init(tee_logger::LoggerConfig::default()).unwrap();
/// use tee_logger::info;
/// info!("Application started");
/// info!("Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::__facade_call!(info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # tee_logger::global::init(tee_logger::LoggerConfig::default()).unwrap();
/// use tee_logger::warn;
/// warn!("Low disk space");
/// warn!("free_mb" => 120; "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::__facade_call!(warn, $($arg)+)
    };
}

/// Log an error-level message with a stack trace attached.
///
/// # Examples
///
/// ```
/// # tee_logger::global::init(tee_logger::LoggerConfig::default()).unwrap();
/// use tee_logger::error;
/// error!("Failed to connect to database");
/// error!("code" => 500; "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::__facade_call!(error, $($arg)+)
    };
}

/// Log a fatal-level message, flush, and exit the process with status 1.
///
/// # Examples
///
/// ```no_run
/// # tee_logger::global::init(tee_logger::LoggerConfig::default()).unwrap();
/// use tee_logger::fatal;
/// fatal!("disk" => "/dev/sda1"; "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        $crate::__facade_call!(fatal, $($arg)+)
    };
}
