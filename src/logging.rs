//! Tracing subscriber setup.
//!
//! CLI commands log to stderr so stdout stays clean for reports. The TUI owns the
//! terminal, so it logs to `logs/heat.log` instead. Filtering follows `RUST_LOG`
//! and defaults to `cpi_heat=info`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "cpi_heat=info";
pub const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "heat.log";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Install the global subscriber.
///
/// Keep the returned guard alive until exit so buffered file logs are flushed.
/// A second call is a no-op (the first subscriber stays installed).
pub fn init(target: LogTarget) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .try_init();
            None
        }
        LogTarget::File => {
            // The TUI owns stderr, so an unusable log directory discards logs.
            let (writer, guard) = match file_appender(Path::new(LOG_DIR)) {
                Ok(appender) => tracing_appender::non_blocking(appender),
                Err(e) => {
                    eprintln!("logging disabled: {e}");
                    tracing_appender::non_blocking(std::io::sink())
                }
            };
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init();
            Some(guard)
        }
    }
}

/// Non-rotating `heat.log` appender in `dir`, created if missing.
fn file_appender(dir: &Path) -> Result<RollingFileAppender, String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("cannot create '{}': {e}", dir.display()))?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(dir)
        .map_err(|e| format!("cannot open '{}': {e}", dir.join(LOG_FILE).display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appender_creates_missing_log_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("logs");
        assert!(file_appender(&dir).is_ok());
        assert!(dir.is_dir());
    }

    #[test]
    fn unusable_log_dir_is_an_error_not_a_panic() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let err = file_appender(&blocker.join("logs")).unwrap_err();
        assert!(err.contains("cannot create"));
    }
}
