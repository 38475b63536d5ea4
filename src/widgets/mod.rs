//! Widget system for the BuildTrack dashboard.
//!
//! This module defines the `Widget` trait that all dashboard widgets
//! implement, and the `WidgetRegistry` mapping each [`WidgetType`] to its
//! static [`WidgetDefinition`] (rendering component, default size, allowed
//! sizes, settings schema).
//!
//! # Architecture
//!
//! A placed widget is a [`crate::layout::WidgetInstance`]. To draw it the
//! host resolves the instance's type through the registry, creates the
//! component and calls [`Widget::render`] with the instance's
//! [`WidgetProps`] and a shared [`WidgetContext`]. Rendering is fallible:
//! a widget whose settings point at missing data returns a [`RenderError`],
//! which the host shows in place of the widget until the user retries.
//!
//! # Example
//!
//! ```
//! use buildtrack_dashboard::widgets::{WidgetRegistry, WidgetType};
//!
//! let registry = WidgetRegistry::new();
//! let def = registry.get(WidgetType::TaskList).expect("built-in");
//! assert!(def.allows(def.default_size));
//! assert!(registry.lookup_str("gantt_chart").is_none());
//! ```

pub mod budget_summary;
pub mod context;
pub mod definition;
pub mod project_overview;
pub mod site_weather;
pub mod task_list;
pub mod team_activity;
pub mod upcoming_deadlines;

pub use context::WidgetContext;
pub use definition::{
    ParseWidgetSizeError, ParseWidgetTypeError, SettingField, SettingKind, Settings,
    WidgetDefinition, WidgetSize, WidgetType,
};

use ratatui::text::Line;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Props handed to a widget component when it renders.
#[derive(Debug, Clone, Copy)]
pub struct WidgetProps<'a> {
    /// Instance id
    pub id: &'a str,
    /// Translated title
    pub title: &'a str,
    /// Instance settings
    pub settings: &'a Settings,
    /// Whether the dashboard is in edit mode
    pub is_edit_mode: bool,
    /// Columns available inside the widget frame
    pub width: u16,
    /// Rows available inside the widget frame
    pub height: u16,
}

/// Why a widget could not render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Settings reference data that doesn't exist.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// What was looked up (project, site, ...)
        kind: &'static str,
        /// The missing identifier
        id: String,
    },

    /// A setting has the wrong type or an out-of-range value.
    #[error("setting '{key}' is invalid: {reason}")]
    InvalidSetting {
        /// Setting key
        key: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Trait for dashboard widgets.
///
/// Each widget renders a list of lines for the area it is given. Widgets
/// must be thread-safe (`Send + Sync`).
pub trait Widget: Send + Sync {
    /// Render the widget content.
    ///
    /// The host clips the returned lines to `props.height` rows.
    fn render(
        &self,
        props: &WidgetProps<'_>,
        context: &WidgetContext<'_>,
    ) -> Result<Vec<Line<'static>>, RenderError>;

    /// Type of this widget.
    fn widget_type(&self) -> WidgetType;
}

/// Factory function type for creating widget instances.
pub type WidgetFactory = fn() -> Box<dyn Widget>;

/// Registry mapping widget types to their static definitions.
///
/// # Example
///
/// ```
/// use buildtrack_dashboard::widgets::{WidgetRegistry, WidgetType};
///
/// let registry = WidgetRegistry::new();
/// assert!(registry.create(WidgetType::SiteWeather).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct WidgetRegistry {
    definitions: HashMap<WidgetType, &'static WidgetDefinition>,
}

impl WidgetRegistry {
    /// Creates a new registry with all built-in widget definitions.
    pub fn new() -> Self {
        let mut reg = Self {
            definitions: HashMap::new(),
        };
        let builtins: [&'static WidgetDefinition; 6] = [
            &project_overview::DEFINITION,
            &task_list::DEFINITION,
            &budget_summary::DEFINITION,
            &team_activity::DEFINITION,
            &upcoming_deadlines::DEFINITION,
            &site_weather::DEFINITION,
        ];
        for def in builtins {
            reg.register(def);
        }
        reg
    }

    /// Creates a registry without any definitions.
    pub fn empty() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    /// Register a definition for its widget type.
    ///
    /// Overwrites any existing definition for the same type.
    pub fn register(&mut self, definition: &'static WidgetDefinition) {
        self.definitions.insert(definition.widget_type, definition);
    }

    /// Definition for `widget_type`, if registered.
    pub fn get(&self, widget_type: WidgetType) -> Option<&'static WidgetDefinition> {
        self.definitions.get(&widget_type).copied()
    }

    /// Definition for a type name as stored or typed by a user.
    ///
    /// Returns `None` for unknown names.
    pub fn lookup_str(&self, name: &str) -> Option<&'static WidgetDefinition> {
        name.parse::<WidgetType>().ok().and_then(|t| self.get(t))
    }

    /// Create the rendering component for `widget_type`.
    ///
    /// Returns `None` if no definition is registered (renders nothing).
    pub fn create(&self, widget_type: WidgetType) -> Option<Box<dyn Widget>> {
        self.get(widget_type).map(|def| (def.factory)())
    }

    /// Registered widget types in catalogue order.
    pub fn available_types(&self) -> Vec<WidgetType> {
        let mut types: Vec<WidgetType> = self.definitions.keys().copied().collect();
        types.sort();
        types
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Setting accessors shared by the widget components
// ---------------------------------------------------------------------------

/// Reads a non-negative integer setting, falling back to `default` when unset.
pub(crate) fn setting_u64(settings: &Settings, key: &str, default: u64) -> Result<u64, RenderError> {
    match settings.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v.as_u64().ok_or_else(|| RenderError::InvalidSetting {
            key: key.to_string(),
            reason: format!("expected a non-negative integer, got {v}"),
        }),
    }
}

/// Reads a boolean setting, falling back to `default` when unset.
pub(crate) fn setting_bool(settings: &Settings, key: &str, default: bool) -> Result<bool, RenderError> {
    match settings.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v.as_bool().ok_or_else(|| RenderError::InvalidSetting {
            key: key.to_string(),
            reason: format!("expected true or false, got {v}"),
        }),
    }
}

/// Reads a string setting, falling back to `default` when unset.
pub(crate) fn setting_str<'a>(
    settings: &'a Settings,
    key: &str,
    default: &'a str,
) -> Result<&'a str, RenderError> {
    match settings.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v.as_str().ok_or_else(|| RenderError::InvalidSetting {
            key: key.to_string(),
            reason: format!("expected text, got {v}"),
        }),
    }
}

/// Shortens `text` to at most `width` characters, marking the cut with `…`.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Text progress bar such as `[#####.....]`, `width` counting the brackets.
pub(crate) fn progress_bar(percent: u64, width: usize) -> String {
    let inner = width.saturating_sub(2);
    let filled = ((percent.min(100) as usize) * inner + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(inner - filled))
}
