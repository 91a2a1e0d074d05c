//! Log file setup
//!
//! The TUI owns the terminal, so logs go to a daily rolling file under the
//! platform data directory (`~/.local/share/skydash/logs/` on Linux). The
//! filter is read from `SKYDASH_LOG` and defaults to `info`.

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "SKYDASH_LOG";

const LOG_FILE_PREFIX: &str = "skydash.log";

/// Default directory for log files
pub fn log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "skydash").map(|dirs| dirs.data_local_dir().join("logs"))
}

/// Filter from `SKYDASH_LOG`, or `info`
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber writing to `dir`.
///
/// Returns the guard that flushes buffered lines on drop; keep it alive for
/// the lifetime of the program. Returns `None` when a subscriber is already
/// installed.
pub fn init(dir: PathBuf) -> Option<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(non_blocking_file);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .try_init()
        .ok()
        .map(|_| guard)
}
