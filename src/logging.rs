//! File-backed logging setup.
//!
//! The TUI owns stdout and stderr, so diagnostics go to a log file under
//! the user's data directory instead. Filtering follows `RUST_LOG`, with an
//! `info` default.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Where the log file lives: `~/.local/share/wurli/wurli.log` (XDG).
pub fn log_file_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("wurli").join("wurli.log"))
}

/// Install the global tracing subscriber.
///
/// Logging is best-effort: when the log file cannot be created the
/// subscriber is simply not installed and the application runs silent.
pub fn init() {
    let Some(path) = log_file_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = File::create(&path) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}
