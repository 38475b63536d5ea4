//! Logging initialization.
//!
//! Configures the `tracing` subscriber with level filtering via the `BTD_LOG`
//! environment variable, falling back to the configured `log.level`.
//!
//! # Usage
//!
//! ```bash
//! # Configured level (default info)
//! btd layout show
//!
//! # Debug level
//! BTD_LOG=debug btd layout show
//!
//! # Module-specific filtering
//! BTD_LOG=buildtrack_dashboard::layout=debug,warn btd tui
//! ```

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::schema::LogLevel;
use crate::config::xdg;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "BTD_LOG";

/// Filter from `BTD_LOG`, or `level` when the variable is unset or invalid.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.as_filter()))
}

/// Initialize the tracing subscriber.
///
/// With `file`, log lines are appended to it (parent directories are
/// created); otherwise they go to stderr. A second call is a no-op.
pub fn init(level: LogLevel, file: Option<&Path>) -> std::io::Result<()> {
    let filter = env_filter(level);

    let result = match file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                xdg::ensure_dir(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    if result.is_ok() {
        tracing::debug!(log_file = ?file, "logging initialized");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_filter_parses_valid_directives() {
        for d in ["info", "debug", "warn", "error", "trace"] {
            assert!(EnvFilter::try_new(d).is_ok(), "failed to parse directive: {d}");
        }
    }

    #[test]
    fn env_filter_parses_module_directive() {
        assert!(EnvFilter::try_new("buildtrack_dashboard::layout=debug,warn").is_ok());
    }

    #[test]
    fn init_with_file_creates_parent_dirs() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("logs/btd.log");
        init(LogLevel::Debug, Some(&path)).expect("init");
        assert!(path.exists());
    }
}
