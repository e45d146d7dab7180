//! Logging Module
//!
//! Sets up `tracing` for the binary:
//! - JSON file output through a daily rolling appender
//! - Human-readable stderr output (stdout is reserved for generated personas)
//! - `log` crate bridge, since library code logs through the `log` facade
//! - miette hook for error reports

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::AppConfig;

pub const LOG_FILE_NAME: &str = "zunzuneo.log";

/// Build the filter: `RUST_LOG` wins, otherwise the configured level.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global logging system.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// process so buffered file logs are flushed on shutdown.
pub fn init(config: &AppConfig) -> WorkerGuard {
    let log_dir = config.log_dir();
    ensure_dir(&log_dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = env_filter(&config.logging.level);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(filter.clone());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .compact()
        .with_target(false)
        .with_filter(filter);

    // try_init: a second call (tests, embedding) keeps the first subscriber
    if tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Logging already initialized");
    }

    if let Err(e) = tracing_log::LogTracer::init() {
        log::debug!("LogTracer not installed: {}", e);
    }

    init_miette();

    log::debug!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_NAME)
    );

    guard
}

fn ensure_dir(dir: &Path) {
    if !dir.exists() {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Failed to create logs directory {}: {}", dir.display(), e);
        }
    }
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}

/// Default log directory when the config does not override it.
pub fn default_log_dir() -> PathBuf {
    AppConfig::default().log_dir()
}
