//! Timestamp formatting utilities
//!
//! Both encoders default to local time with millisecond precision
//! (`2025-01-08 10:30:45.123`). ISO 8601, Unix millis and custom strftime
//! formats are available for deployments whose tooling expects them.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// strftime pattern of the default encoder timestamp
pub const LOCAL_MILLIS_PATTERN: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use tee_logger::core::TimestampFormat;
/// use chrono::Local;
///
/// let ts = TimestampFormat::LocalMillis.format(&Local::now());
/// assert_eq!(ts.len(), "2025-01-08 10:30:45.123".len());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Wall clock in the record's own offset, millisecond precision:
    /// `2025-01-08 10:30:45.123`
    #[default]
    LocalMillis,

    /// ISO 8601 in UTC with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format; an invalid pattern renders as [`Self::LocalMillis`]
    Custom(String),
}

impl TimestampFormat {
    /// Custom strftime format, rejecting patterns chrono cannot render
    pub fn custom(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                "timestamp_format",
                format!("invalid strftime pattern '{}'", pattern),
            ));
        }
        Ok(TimestampFormat::Custom(pattern))
    }

    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            TimestampFormat::LocalMillis => datetime.format(LOCAL_MILLIS_PATTERN).to_string(),
            TimestampFormat::Iso8601 => datetime
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::new();
                match write!(out, "{}", datetime.format(format_str)) {
                    Ok(()) => out,
                    Err(_) => datetime.format(LOCAL_MILLIS_PATTERN).to_string(),
                }
            }
        }
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::UnixMillis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_local_millis_format() {
        let result = TimestampFormat::LocalMillis.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08 10:30:45.123");
    }

    #[test]
    fn test_local_millis_keeps_offset_wall_clock() {
        let offset = chrono::FixedOffset::east_opt(7 * 3600).expect("valid offset");
        let result = TimestampFormat::LocalMillis.format(&fixed_datetime().with_timezone(&offset));
        assert_eq!(result, "2025-01-08 17:30:45.123");
    }

    #[test]
    fn test_iso8601_format() {
        let result = TimestampFormat::Iso8601.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_unix_millis_format() {
        let result = TimestampFormat::UnixMillis.format(&fixed_datetime());
        assert_eq!(result, "1736332245123");
        assert!(TimestampFormat::UnixMillis.is_numeric());
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025/01/08 10:30");
    }

    #[test]
    fn test_invalid_custom_pattern_falls_back() {
        let format = TimestampFormat::Custom("%Q".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025-01-08 10:30:45.123");
    }

    #[test]
    fn test_custom_constructor_validates() {
        assert_eq!(
            TimestampFormat::custom("%H:%M").unwrap(),
            TimestampFormat::Custom("%H:%M".to_string())
        );
        let err = TimestampFormat::custom("%Q").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_default_is_local_millis() {
        assert_eq!(TimestampFormat::default(), TimestampFormat::LocalMillis);
    }
}
