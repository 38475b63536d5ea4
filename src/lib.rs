//! BuildTrack Dashboard library
//!
//! This crate provides the configurable dashboard of the BuildTrack
//! construction-project manager: a per-user grid of widgets that can be
//! added, removed, dragged, resized and configured, persisted to local
//! key/value storage.
//!
//! The pieces fit together as follows:
//!
//! - [`widgets`]: the static widget registry (type → component, default size,
//!   allowed sizes, settings schema) and the widget components themselves.
//! - [`layout`]: the per-user layout state and its validated mutations.
//! - [`interaction`]: the drag/resize controller turning pointer gestures
//!   into layout mutations while the dashboard is in edit mode.
//! - [`settings_panel`]: the per-widget settings editor.
//! - [`tui`]: the terminal front end hosting all of the above.

/// Mock authentication backed by the local users database.
pub mod auth;

/// Configuration utilities including XDG path resolution.
pub mod config;

/// Demo project data rendered by the widgets.
pub mod data;

/// Built-in translation catalogs.
pub mod i18n;

/// Drag/resize controller for edit mode.
pub mod interaction;

/// Layout state: placed widgets, validation and persistence.
pub mod layout;

/// Logging initialization.
pub mod logging;

/// Per-widget settings editor.
pub mod settings_panel;

/// TUI module providing the terminal user interface for the dashboard.
pub mod tui;

/// Widget registry and widget components.
pub mod widgets;

/// Number of columns of the dashboard grid.
///
/// Widget size classes are expressed in cells of this grid, the widest
/// (`extra_large`) spanning all of it.
pub const GRID_COLUMNS: u16 = 12;
