//! File logging example
//!
//! Demonstrates console and rotating JSON file output at the same time,
//! then swaps the global logger for one with a stricter file level.
//!
//! Run with: cargo run --example file_logging

use tee_logger::prelude::*;
use tee_logger::{debug, info, warn};

fn main() -> Result<()> {
    println!("=== Tee Logger - File Logging Example ===\n");

    let file = FileLogConfig {
        max_size_mb: 10,
        max_backups: 3,
        max_age_days: 7,
        compress: true,
        ..FileLogConfig::at("logs/application.log")
    };
    tee_logger::global::init(LoggerConfig::default().with_level(LogLevel::Debug).with_file(file))?;

    println!("1. Logging to both console and file:");
    info!("Application started");
    debug!("Loading configuration...");
    info!("db" => "orders"; "Database connection established");

    println!("\n2. Replacing the logger at runtime (file now WARN and above):");
    let stricter = FileLogConfig::at("logs/application.log");
    tee_logger::global::init(LoggerConfig::default().with_level(LogLevel::Warn).with_file(stricter))?;

    info!("Only on the console");
    warn!("elapsed_ms" => 1500; "Item took longer than expected");

    tee_logger::global::sync()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'logs/application.log' for the JSON output");
    Ok(())
}
