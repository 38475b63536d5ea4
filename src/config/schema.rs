//! TOML configuration schema types for the BuildTrack dashboard.
//!
//! All structs derive `Deserialize` and `Serialize` with defaults via
//! `#[serde(default)]`, so any subset of the file (including an empty one)
//! parses.
//!
//! Duration fields use human-readable strings (e.g. `"250ms"`, `"1s"`)
//! parsed by the `humantime` crate.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::error::ConfigError;
use crate::config::xdg;
use crate::i18n::Locale;
use crate::layout::{GridBounds, DEFAULT_MAX_ROWS};
use crate::widgets::WidgetSize;
use crate::GRID_COLUMNS;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration encompassing all sections.
///
/// Corresponds to the full TOML file structure:
/// ```toml
/// [dashboard]
/// [user]
/// [storage]
/// [log]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Grid and rendering settings.
    pub dashboard: DashboardConfig,
    /// Default user and language.
    pub user: UserConfig,
    /// Local storage location.
    pub storage: StorageConfig,
    /// Logging settings.
    pub log: LogConfig,
}

impl Config {
    /// Checks value ranges that the TOML types can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (_, tallest) = WidgetSize::ExtraLarge.dimensions();
        if self.dashboard.max_rows < tallest {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.max_rows",
                message: format!("must be at least {tallest}"),
            });
        }
        if !(1..=10).contains(&self.dashboard.row_height) {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.row_height",
                message: "must be between 1 and 10".to_string(),
            });
        }
        self.tick_rate()?;
        if self.user.default_email.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "user.default_email",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Render tick interval.
    pub fn tick_rate(&self) -> Result<Duration, ConfigError> {
        let rate = humantime::parse_duration(&self.dashboard.tick_rate).map_err(|e| {
            ConfigError::InvalidValue {
                field: "dashboard.tick_rate",
                message: e.to_string(),
            }
        })?;
        if rate.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.tick_rate",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(rate)
    }

    /// Grid extent used by the layout.
    pub fn grid_bounds(&self) -> GridBounds {
        GridBounds::new(GRID_COLUMNS, self.dashboard.max_rows)
    }

    /// File backing the local key/value store.
    ///
    /// `None` when no path is configured and no data directory can be
    /// determined.
    pub fn storage_path(&self) -> Option<PathBuf> {
        if self.storage.path.is_empty() {
            buildtrack_storage::default_path()
        } else {
            Some(xdg::expand_tilde(&self.storage.path))
        }
    }

    /// Log file, if one is configured.
    pub fn log_file(&self) -> Option<PathBuf> {
        (!self.log.file.is_empty()).then(|| xdg::expand_tilde(&self.log.file))
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Grid and rendering configuration.
///
/// The grid is always 12 columns wide; only its height is configurable.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Number of grid rows widgets may occupy.
    pub max_rows: u16,
    /// Terminal rows per grid row.
    pub row_height: u16,
    /// Render tick rate as a human-readable duration (e.g. `"250ms"`).
    pub tick_rate: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            row_height: 3,
            tick_rate: "250ms".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// Which user the dashboard opens for, and in which language.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UserConfig {
    /// Email of the user logged in when `--user` is not given.
    pub default_email: String,
    /// UI language.
    pub locale: Locale,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            default_email: "ana@buildtrack.test".to_string(),
            locale: Locale::En,
        }
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Local key/value store configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the storage file. Empty means
    /// `$XDG_DATA_HOME/buildtrack/local_storage.json`.
    pub path: String,
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Logging verbosity, overridden by `BTD_LOG`.
    pub level: LogLevel,
    /// Path to log file. Empty string means stderr (the TUI then logs to
    /// `buildtrack-dashboard.log` in the data directory instead).
    pub file: String,
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational messages (default).
    #[default]
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
