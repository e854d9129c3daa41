//! Integration tests for tee_logger
//!
//! These tests verify:
//! - Global init, replacement and failed re-init
//! - Per-sink thresholds (console vs file)
//! - Size-driven rotation with retention through a composed logger
//! - Sync makes every written byte visible in the file
//! - Log injection prevention

use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use tee_logger::appenders::{
    build_file_sink, ConsoleSink, RotatingFileSink, RotationPolicy, Sink,
};
use tee_logger::global;
use tee_logger::prelude::*;
use tee_logger::{Encoder, SinkCore};
use tempfile::TempDir;

// Tests touching the process-wide handle run one at a time
static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().clone()).expect("console output is UTF-8")
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn plain_console(buf: SharedBuf) -> SinkCore {
    SinkCore::new(
        Sink::Console(ConsoleSink::with_writer(buf)),
        Encoder::Console {
            use_colors: false,
            timestamp_format: Default::default(),
        },
        LogLevel::Debug,
    )
}

fn json_lines(path: &std::path::Path) -> Vec<serde_json::Value> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is one JSON object"))
        .collect()
}

#[test]
fn test_init_with_valid_configs() {
    let _guard = GLOBAL_LOCK.lock();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    global::init(LoggerConfig::default()).expect("console-only config");
    assert!(global::is_initialized());
    global::debug("console only", LogContext::new());

    let log_file = temp_dir.path().join("nested").join("api.log");
    let cfg = LoggerConfig::default()
        .with_level(LogLevel::Debug)
        .with_file(FileLogConfig::at(log_file.to_string_lossy()));
    global::init(cfg).expect("file config");

    global::info("request served", LogContext::new().with_field("status", 200));
    global::warn("slow request", LogContext::new().with_field("ms", 1500));
    global::error("request failed", LogContext::new().with_field("status", 500));
    global::sync().expect("Failed to sync");

    let records = json_lines(&log_file);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["status"], 200);
    assert_eq!(records[1]["level"], "WARN");
    assert!(records[2]["stacktrace"].is_string());
    assert!(records[0]["caller"]
        .as_str()
        .expect("caller present")
        .contains("integration_tests.rs:"));

    let metrics = global::metrics().expect("logger published");
    assert_eq!(metrics.total_logged, 3);
    assert_eq!(metrics.write_failures, 0);
}

#[test]
fn test_failed_init_keeps_previous_logger() {
    let _guard = GLOBAL_LOCK.lock();
    let buf = SharedBuf::default();
    global::set_logger(Logger::builder().core(plain_console(buf.clone())).build());
    let before = global::current().expect("logger published");

    let empty_level = LoggerConfig {
        level: String::new(),
        ..LoggerConfig::default()
    };
    let err = global::init(empty_level).expect_err("empty level must be rejected");
    assert!(err.is_config_error());

    let after = global::current().expect("logger still published");
    assert!(Arc::ptr_eq(&before, &after));

    global::info("still here", LogContext::new());
    assert!(buf.text().contains("still here"));
}

#[test]
fn test_directory_path_is_config_error() {
    let _guard = GLOBAL_LOCK.lock();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    global::init(LoggerConfig::default()).expect("console-only config");
    let before = global::current().expect("logger published");

    let cfg = LoggerConfig::default().with_file(FileLogConfig::at(temp_dir.path().to_string_lossy()));
    let err = global::init(cfg).expect_err("directory path must be rejected");
    assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    assert!(Arc::ptr_eq(&before, &global::current().expect("logger published")));
}

#[test]
fn test_set_logger_returns_replaced_instance() {
    let _guard = GLOBAL_LOCK.lock();
    let first = SharedBuf::default();
    let second = SharedBuf::default();

    global::set_logger(Logger::builder().core(plain_console(first.clone())).build());
    global::info("to first", LogContext::new());

    let replaced = global::set_logger(Logger::builder().core(plain_console(second.clone())).build());
    assert!(replaced.is_some());
    global::info("to second", LogContext::new());

    assert!(first.text().contains("to first"));
    assert!(!first.text().contains("to second"));
    assert!(second.text().contains("to second"));
}

#[test]
fn test_file_threshold_filters_low_levels() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("warn.log");
    let console = SharedBuf::default();

    let logger = Logger::builder()
        .core(plain_console(console.clone()))
        .core(
            build_file_sink(&FileLogConfig::at(log_file.to_string_lossy()), LogLevel::Warn)
                .expect("Failed to build file sink"),
        )
        .build();

    logger.debug("debug detail", LogContext::new());
    logger.info("info detail", LogContext::new());
    logger.warn("warn detail", LogContext::new());
    logger.error("error detail", LogContext::new());
    logger.sync().expect("Failed to sync");

    let file_msgs: Vec<String> = json_lines(&log_file)
        .iter()
        .map(|r| r["msg"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(file_msgs, vec!["warn detail", "error detail"]);

    let console_text = console.text();
    for msg in ["debug detail", "info detail", "warn detail", "error detail"] {
        assert!(console_text.contains(msg), "console is missing {}", msg);
    }
}

#[test]
fn test_rotation_through_logger_keeps_one_backup() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("rotating.log");

    let policy = RotationPolicy::new().with_max_size(1024).with_max_backups(1);
    let sink = RotatingFileSink::new(&log_file, policy).expect("Failed to create sink");
    let logger = Logger::builder()
        .core(SinkCore::new(Sink::File(sink), Encoder::json(), LogLevel::Info))
        .build();

    for i in 0..60 {
        logger.info(format!("record number {}", i), LogContext::new().with_field("i", i));
    }
    logger.sync().expect("Failed to sync");

    let Sink::File(sink) = logger.tee().cores()[0].sink() else {
        panic!("expected file sink");
    };
    assert!(sink.rotations() >= 3, "only {} rotations", sink.rotations());

    let backups = sink.backups().expect("Failed to list backups");
    assert_eq!(backups.len(), 1);
    assert_ne!(backups[0].path, log_file);

    // The newest record is in the active file
    let records = json_lines(&log_file);
    assert_eq!(records.last().expect("active file has records")["i"], 59);
    assert!(fs::metadata(&log_file).expect("active file exists").len() <= 1024);
}

#[test]
fn test_sync_exposes_all_bytes() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("synced.log");
    let sink = RotatingFileSink::new(&log_file, RotationPolicy::default()).expect("Failed to create sink");

    let mut expected = 0u64;
    for i in 0..200 {
        let record = format!("{{\"n\":{}}}\n", i);
        expected += record.len() as u64;
        sink.write(record.as_bytes()).expect("Failed to write");
    }
    sink.flush().expect("Failed to flush");

    assert_eq!(fs::metadata(&log_file).expect("file exists").len(), expected);
}

#[test]
fn test_log_injection_prevention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("injection_test.log");
    let logger = Logger::builder()
        .core(
            build_file_sink(&FileLogConfig::at(log_file.to_string_lossy()), LogLevel::Info)
                .expect("Failed to build file sink"),
        )
        .build();

    let malicious_message = "User login\nERROR [2024-10-17] Fake error injected\nINFO Continuation";
    logger.info(malicious_message, LogContext::new());
    logger.sync().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), 1, "Log should be a single line");
    assert!(!content.contains("\nERROR [2024-10-17] Fake error injected\n"));
}

#[test]
fn test_config_file_roundtrip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let cfg_path = temp_dir.path().join("logger.toml");
    let log_path = temp_dir.path().join("from_toml.log");
    fs::write(
        &cfg_path,
        format!(
            "level = \"ERROR\"\n\n[file]\nenabled = true\npath = {:?}\nmax_backups = 2\n",
            log_path.to_string_lossy()
        ),
    )
    .expect("Failed to write config");

    let cfg = LoggerConfig::load(&cfg_path).expect("Failed to load config");
    assert_eq!(cfg.min_level(), LogLevel::Error);

    let logger = Logger::from_config(&cfg).expect("Failed to build logger");
    assert_eq!(logger.tee().cores().len(), 2);
    assert_eq!(logger.tee().cores()[1].threshold(), LogLevel::Error);
}
