//! Logging setup for the dashboard process.
//!
//! Two files are written in the log directory: `app.log` with everything at
//! the configured level and above, and `errors.log` with errors only (plus
//! source locations). Console output is added on request or in debug mode.
//! A file that has grown past [`MAX_LOG_BYTES`] is rolled over to `<name>.1`
//! when logging starts, keeping up to [`LOG_BACKUPS`] older copies.

use crate::config::LogConfig;
use crate::errors::Result;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Subscriber, debug};
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// File receiving all log lines
pub const APP_LOG_FILE: &str = "app.log";
/// File receiving error lines only
pub const ERROR_LOG_FILE: &str = "errors.log";
/// Size at which a log file is rolled over on startup
pub const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;
/// Number of rolled-over copies kept per log file
pub const LOG_BACKUPS: usize = 5;

/// Shifts `path` to `path.1` (and `path.1` to `path.2`, and so on) when it is
/// at least `max_bytes` long. The oldest copy beyond `backups` is removed.
/// Returns whether a rollover happened.
pub fn rotate_if_large(path: &Path, max_bytes: u64, backups: usize) -> Result<bool> {
    let len = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    if len < max_bytes {
        return Ok(false);
    }

    let backup = |n: usize| {
        let mut name = path.as_os_str().to_owned();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    };

    if backups == 0 {
        std::fs::remove_file(path)?;
        return Ok(true);
    }
    let oldest = backup(backups);
    if oldest.exists() {
        std::fs::remove_file(&oldest)?;
    }
    for n in (1..backups).rev() {
        let from = backup(n);
        if from.exists() {
            std::fs::rename(&from, backup(n + 1))?;
        }
    }
    std::fs::rename(path, backup(1))?;
    Ok(true)
}

fn open_log_file(dir: &Path, name: &str) -> Result<File> {
    rotate_if_large(&dir.join(name), MAX_LOG_BYTES, LOG_BACKUPS)?;
    Ok(OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(name))?)
}

/// Builds the subscriber described by `config` without installing it.
///
/// `RUST_LOG`, when set, takes precedence over `config.level` for `app.log`
/// and the console.
pub fn build_subscriber(config: &LogConfig) -> Result<impl Subscriber + Send + Sync + 'static> {
    std::fs::create_dir_all(&config.dir)?;
    let app_file = open_log_file(&config.dir, APP_LOG_FILE)?;
    let error_file = open_log_file(&config.dir, ERROR_LOG_FILE)?;

    let level_filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
    };

    let app_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(app_file))
        .with_filter(level_filter());

    let error_layer = fmt::layer()
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(Mutex::new(error_file))
        .with_filter(LevelFilter::ERROR);

    let console_layer = config
        .console_enabled()
        .then(|| fmt::layer().with_filter(level_filter()));

    Ok(tracing_subscriber::registry()
        .with(app_layer)
        .with(error_layer)
        .with(console_layer))
}

/// Installs the process-wide subscriber.
///
/// Calling this again, or after another subscriber was installed, leaves the
/// existing one in place.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let subscriber = build_subscriber(config)?;
    if let Err(e) = subscriber.try_init() {
        debug!("Logging already initialized, keeping existing subscriber: {}", e);
    }
    Ok(())
}
