// src/logging.rs
// =============================================================================
// tracing setup: human-readable logs on stderr, filtered by RUST_LOG
// (default "info"), plus an optional plain-text copy in a log file.
//
// stdout is kept for the results table / JSON so it can be piped.
// =============================================================================

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}
