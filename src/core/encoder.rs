//! Record encoders
//!
//! - Console: human-readable, tab separated, colorized level
//! - Json: one machine-readable object per line
//!
//! The set is closed; each sink pairs with exactly one encoder.

use super::error::Result;
use super::log_context::LogContext;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use colored::Colorize;
use serde::Serialize;

/// Serialization format applied to a record before it reaches a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoder {
    /// Example: `2025-01-08 10:30:45.123	INFO	src/main.rs:12	Request processed	{"id":7}`
    Console {
        use_colors: bool,
        timestamp_format: TimestampFormat,
    },

    /// Example: `{"level":"INFO","ts":"2025-01-08 10:30:45.123","caller":"src/main.rs:12","msg":"Request processed","id":7}`
    Json { timestamp_format: TimestampFormat },
}

impl Encoder {
    /// Colorized console encoder with millisecond timestamps
    pub fn console() -> Self {
        Encoder::Console {
            use_colors: true,
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// JSON encoder with millisecond timestamps
    pub fn json() -> Self {
        Encoder::Json {
            timestamp_format: TimestampFormat::default(),
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        match &mut self {
            Encoder::Console {
                timestamp_format, ..
            }
            | Encoder::Json { timestamp_format } => *timestamp_format = format,
        }
        self
    }

    /// Encode one record, including the trailing newline
    pub fn encode(&self, entry: &LogEntry) -> Result<String> {
        match self {
            Encoder::Console {
                use_colors,
                timestamp_format,
            } => Ok(encode_console(entry, *use_colors, timestamp_format)),
            Encoder::Json { timestamp_format } => encode_json(entry, timestamp_format),
        }
    }
}

fn encode_console(entry: &LogEntry, use_colors: bool, timestamp_format: &TimestampFormat) -> String {
    let level_str = if use_colors {
        entry
            .level
            .to_str()
            .color(entry.level.color_code())
            .to_string()
    } else {
        entry.level.to_str().to_string()
    };

    let mut out = format!("{}\t{}", timestamp_format.format(&entry.timestamp), level_str);
    if let Some(ref caller) = entry.caller {
        out.push('\t');
        out.push_str(&caller.to_string());
    }
    out.push('\t');
    out.push_str(&entry.message);

    if !entry.fields.is_empty() {
        out.push('\t');
        out.push_str(&serde_json::to_string(&entry.fields).unwrap_or_else(|_| entry.fields.format_fields()));
    }
    out.push('\n');

    if let Some(ref stack) = entry.stacktrace {
        out.push_str(stack.trim_end());
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    level: &'static str,
    ts: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    caller: Option<String>,
    msg: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stacktrace: Option<&'a str>,
    #[serde(flatten)]
    fields: &'a LogContext,
}

fn encode_json(entry: &LogEntry, timestamp_format: &TimestampFormat) -> Result<String> {
    let ts = if timestamp_format.is_numeric() {
        serde_json::Value::from(entry.timestamp.timestamp_millis())
    } else {
        serde_json::Value::String(timestamp_format.format(&entry.timestamp))
    };

    let record = JsonRecord {
        level: entry.level.to_str(),
        ts,
        caller: entry.caller.as_ref().map(ToString::to_string),
        msg: &entry.message,
        stacktrace: entry.stacktrace.as_deref(),
        fields: &entry.fields,
    };

    let mut line = serde_json::to_string(&record)?;
    line.push('\n');
    Ok(line)
}
