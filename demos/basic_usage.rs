//! Basic usage example
//!
//! Initializes the global logger with console output only and logs at
//! every level below FATAL.
//!
//! Run with: cargo run --example basic_usage

use tee_logger::prelude::*;
use tee_logger::{debug, error, info, warn};

fn main() -> Result<()> {
    println!("=== Tee Logger - Basic Usage Example ===\n");

    tee_logger::global::init(LoggerConfig::default())?;

    println!("1. Plain messages:");
    debug!("Loading configuration...");
    info!("Application started");
    warn!("Using default settings for some options");

    println!("\n2. Formatted messages with fields:");
    for i in 1..=3 {
        info!("item" => i, "total" => 3; "Processing item {}/3", i);
    }

    println!("\n3. Errors carry a stack trace:");
    error!("plugin" => "metrics"; "Failed to load optional plugin");

    println!("\n4. Function API with an explicit context:");
    let ctx = LogContext::new()
        .with_field("user_id", 42)
        .with_field("action", "login");
    tee_logger::global::info("User logged in", ctx);

    tee_logger::global::sync()?;

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
