// src/logging.rs
//! Tracing subscriber setup

use crate::{config::FinderConfig, error::Result};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "RESTAURANT_FINDER_LOG";
pub const LOG_FILE: &str = "restaurant-finder.log";

fn env_filter() -> EnvFilter {
    let directives = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV))
        .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")));
    EnvFilter::new(directives)
}

/// Log to a file in the data directory; the terminal belongs to the UI
pub fn init_file_logging() -> Result<PathBuf> {
    let directory = FinderConfig::get_data_dir()?;
    std::fs::create_dir_all(&directory)?;
    let log_path = directory.join(LOG_FILE);
    let log_file = std::fs::File::create(&log_path)?;

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::sync::Mutex::new(log_file))
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter());
    tracing_subscriber::registry().with(file_layer).init();

    Ok(log_path)
}

/// Log to stderr for the one-shot commands
pub fn init_stderr_logging() {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter());
    tracing_subscriber::registry().with(stderr_layer).init();
}
