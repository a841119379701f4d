//! Logging Module
//!
//! Sets up `tracing` with:
//! - A JSON file layer (daily rolling, non-blocking) in the app data directory
//! - `log` macro forwarding through `tracing-log`
//! - miette's graphical handler for fatal error reports

use std::fs;
use std::io;
use std::path::PathBuf;

use supports_color::Stream;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// File name prefix of the rolling log.
pub const LOG_FILE_NAME: &str = "wordsift.log";

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Directory holding the rolling log files.
pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("wordsift").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn file_writer() -> (tracing_appender::non_blocking::NonBlocking, WorkerGuard) {
    let log_dir = log_dir();
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    tracing_appender::non_blocking(file_appender)
}

/// Initialize logging for TUI mode.
///
/// Logs go to the rolling file only; a stdout layer would corrupt the
/// terminal while ratatui is in raw/alternate-screen mode. Returns a
/// `WorkerGuard` which must be kept alive for the duration of the
/// application so buffered logs are flushed on shutdown.
pub fn init_tui() -> WorkerGuard {
    let (non_blocking, guard) = file_writer();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter());

    tracing_subscriber::registry().with(file_layer).init();

    finish_init();
    guard
}

fn finish_init() {
    // Redirect standard `log` macros to `tracing`. Already installed when
    // tracing-subscriber's own `tracing-log` feature is enabled.
    tracing_log::LogTracer::init().ok();

    init_miette();

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir().join(LOG_FILE_NAME)
    );
}

fn init_miette() {
    use is_terminal::IsTerminal;

    let colorize = io::stderr().is_terminal() && supports_color::on(Stream::Stderr).is_some();
    let unicode = std::env::var("TERM")
        .map(|t| !t.contains("dumb"))
        .unwrap_or(true);

    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(unicode)
                .context_lines(3)
                .break_words(true)
                .color(colorize)
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}
