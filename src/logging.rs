//! Logging setup for db-relay.
//!
//! The relay logs through `tracing` and normally inherits whatever
//! subscriber the host application installed. These helpers cover the
//! standalone cases: stderr output for short-lived embedders, or a log file
//! under the platform state directory for long-running hosts. Both are
//! idempotent — a second call is a no-op, not a panic — so a library
//! consumer can call them without coordinating with the host.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initializes logging to a file.
///
/// Location: `~/.local/state/db-relay/relay.log` on Linux (XDG state
/// directory), or the platform-appropriate state/config directory elsewhere.
/// The file is opened in append mode so successive runs share one history.
pub fn init_file_logging() {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: could not create log directory: {e}");
            return;
        }
    }

    let log_file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file: {e}");
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(log_file)
        .with_ansi(false) // No ANSI colors in file output
        .try_init();
}

/// Initializes logging to stderr.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter()).try_init();
}

/// Filter from `RUST_LOG`, falling back to `info`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Returns the path for the log file.
pub fn get_log_path() -> PathBuf {
    // Try state directory first (XDG_STATE_HOME on Linux)
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("db-relay").join("relay.log");
    }

    // Fall back to config directory
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("db-relay").join("relay.log");
    }

    // Last resort: temp directory
    std::env::temp_dir().join("relay.log")
}
