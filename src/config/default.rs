//! Default configuration template and file creation utilities.
//!
//! Provides a commented TOML template that matches `Config::default()` and
//! functions to write it to the XDG config path (or an explicit path).

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

/// A commented TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
/// Sections: `[dashboard]`, `[user]`, `[storage]`, `[log]`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# BuildTrack Dashboard Configuration
#
# This file was auto-generated with default values.
# All values shown below are the built-in defaults.
# Uncomment and modify options to customize your dashboard.
#
# Location: $XDG_CONFIG_HOME/buildtrack-dashboard/config.toml

# ==============================================================================
# Dashboard
# ==============================================================================

[dashboard]

# Number of grid rows widgets may be placed in.
# The grid is always 12 columns wide. Must be at least 4 so that the
# tallest widget size fits.
max_rows = 24

# Terminal rows drawn per grid row (1-10).
row_height = 3

# Render tick rate as a human-readable duration.
# Controls how often the TUI redraws when idle.
# Examples: "250ms", "500ms", "1s"
tick_rate = "250ms"

# ==============================================================================
# User
# ==============================================================================

[user]

# Email of the user the dashboard opens for when --user is not given.
# Demo users: ana@, marcus@, priya@, tom@buildtrack.test
default_email = "ana@buildtrack.test"

# UI language.
# Options: "en", "es"
locale = "en"

# ==============================================================================
# Storage
# ==============================================================================

[storage]

# File holding layouts and the user database.
# Empty means $XDG_DATA_HOME/buildtrack/local_storage.json.
# Tilde (~) is expanded to the user's home directory.
path = ""

# ==============================================================================
# Logging
# ==============================================================================

[log]

# Logging verbosity level. The BTD_LOG environment variable overrides it.
# Options: "error", "warn", "info", "debug", "trace"
level = "info"

# Path to log file. Empty string means log to stderr; the TUI then logs to
# $XDG_DATA_HOME/buildtrack/buildtrack-dashboard.log so the screen stays clean.
file = ""
"#;

// ---------------------------------------------------------------------------
// File creation functions
// ---------------------------------------------------------------------------

/// Creates (or force-overwrites) the default config file at the XDG path.
///
/// See [`create_default_config_at`].
pub fn create_default_config(force: bool) -> Result<PathBuf, ConfigError> {
    let path = xdg::config_path();
    create_default_config_at(&path, force)?;
    Ok(path)
}

/// Writes the default config file to `path`.
///
/// - If the file exists and `force` is `false`, returns `ConfigError::AlreadyExists`.
/// - If the file exists and `force` is `true`, backs it up to `.toml.backup` first.
pub fn create_default_config_at(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        let backup_path = path.with_extension("toml.backup");
        fs::rename(path, &backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_default_config(path)?;
    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}

/// Writes the default template to `path`, creating parent dirs and setting 0600 permissions.
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_error = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        xdg::ensure_dir(parent).map_err(write_error)?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_error)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Config;
    use serial_test::serial;

    /// Run closure with `XDG_CONFIG_HOME` temporarily pointed at `dir`.
    fn with_xdg_config<F: FnOnce()>(dir: &Path, f: F) {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        std::env::set_var("XDG_CONFIG_HOME", dir);
        f();
        match original {
            Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    // -- Template validity --------------------------------------------------

    #[test]
    fn template_values_match_config_default() {
        let from_template: Config =
            toml::from_str(DEFAULT_CONFIG_TEMPLATE).expect("template should parse");
        assert_eq!(from_template, Config::default());
    }

    #[test]
    fn template_contains_all_section_headers() {
        for section in ["[dashboard]", "[user]", "[storage]", "[log]"] {
            assert!(
                DEFAULT_CONFIG_TEMPLATE.contains(section),
                "missing {section} section"
            );
        }
    }

    // -- create_default_config_at -------------------------------------------

    #[test]
    fn create_at_explicit_path() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("nested/config.toml");
        create_default_config_at(&path, false).expect("should succeed");
        let content = fs::read_to_string(&path).expect("should read");
        assert_eq!(content, DEFAULT_CONFIG_TEMPLATE);
    }

    #[test]
    fn create_without_force_returns_already_exists() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("config.toml");
        create_default_config_at(&path, false).expect("first call should succeed");
        let err = create_default_config_at(&path, false).expect_err("should fail");
        match err {
            ConfigError::AlreadyExists { .. } => {}
            other => panic!("expected AlreadyExists, got: {other:?}"),
        }
    }

    #[test]
    fn create_with_force_creates_backup() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("config.toml");
        fs::write(&path, "# custom content\n").expect("seed");

        create_default_config_at(&path, true).expect("force should succeed");

        let backup = path.with_extension("toml.backup");
        assert_eq!(
            fs::read_to_string(&backup).expect("read backup"),
            "# custom content\n"
        );
        assert_eq!(
            fs::read_to_string(&path).expect("read new"),
            DEFAULT_CONFIG_TEMPLATE
        );
    }

    // -- create_default_config (XDG) ----------------------------------------

    #[test]
    #[serial(xdg_config)]
    fn create_returns_xdg_path() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let expected = tmp.path().join("buildtrack-dashboard/config.toml");
        with_xdg_config(tmp.path(), || {
            let path = create_default_config(false).expect("should succeed");
            assert_eq!(path, expected);
            assert!(expected.exists());
        });
    }

    #[cfg(unix)]
    #[test]
    fn file_permissions_are_0600() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("config.toml");
        create_default_config_at(&path, false).expect("should succeed");
        let mode = fs::metadata(&path)
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600, "file should be owner-only read/write");
    }
}
