//! Static widget metadata: types, size classes and settings schemas.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::WidgetFactory;

/// Free-form widget settings.
pub type Settings = serde_json::Map<String, Value>;

/// Kinds of dashboard widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    /// Progress and phase of one project
    ProjectOverview,
    /// Open tasks across projects
    TaskList,
    /// Budget vs. spend per project
    BudgetSummary,
    /// Latest team activity
    TeamActivity,
    /// Tasks due soon
    UpcomingDeadlines,
    /// Weather at a construction site
    SiteWeather,
}

impl WidgetType {
    /// All widget types in catalogue order.
    pub const ALL: [WidgetType; 6] = [
        WidgetType::ProjectOverview,
        WidgetType::TaskList,
        WidgetType::BudgetSummary,
        WidgetType::TeamActivity,
        WidgetType::UpcomingDeadlines,
        WidgetType::SiteWeather,
    ];

    /// Stable snake_case name, as stored and accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetType::ProjectOverview => "project_overview",
            WidgetType::TaskList => "task_list",
            WidgetType::BudgetSummary => "budget_summary",
            WidgetType::TeamActivity => "team_activity",
            WidgetType::UpcomingDeadlines => "upcoming_deadlines",
            WidgetType::SiteWeather => "site_weather",
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error type for parsing WidgetType from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWidgetTypeError(pub String);

impl fmt::Display for ParseWidgetTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown widget type: {}", self.0)
    }
}

impl std::error::Error for ParseWidgetTypeError {}

impl FromStr for WidgetType {
    type Err = ParseWidgetTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        WidgetType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| ParseWidgetTypeError(s.to_string()))
    }
}

/// Size classes a widget can take on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetSize {
    /// 3×2 cells
    Small,
    /// 6×2 cells
    Medium,
    /// 6×4 cells
    Large,
    /// 12×4 cells
    ExtraLarge,
}

impl WidgetSize {
    /// All sizes, smallest first.
    pub const ALL: [WidgetSize; 4] = [
        WidgetSize::Small,
        WidgetSize::Medium,
        WidgetSize::Large,
        WidgetSize::ExtraLarge,
    ];

    /// Width and height in grid cells.
    pub const fn dimensions(self) -> (u16, u16) {
        match self {
            WidgetSize::Small => (3, 2),
            WidgetSize::Medium => (6, 2),
            WidgetSize::Large => (6, 4),
            WidgetSize::ExtraLarge => (12, 4),
        }
    }

    /// The size whose dimensions are exactly `w`×`h`.
    pub fn from_dimensions(w: u16, h: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.dimensions() == (w, h))
    }

    /// The smallest size covering at least `w`×`h` cells.
    pub fn covering(w: u16, h: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|s| {
            let (sw, sh) = s.dimensions();
            sw >= w && sh >= h
        })
    }

    /// Stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetSize::Small => "small",
            WidgetSize::Medium => "medium",
            WidgetSize::Large => "large",
            WidgetSize::ExtraLarge => "extra_large",
        }
    }
}

impl fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error type for parsing WidgetSize from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWidgetSizeError(pub String);

impl fmt::Display for ParseWidgetSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid widget size: {}", self.0)
    }
}

impl std::error::Error for ParseWidgetSizeError {}

impl FromStr for WidgetSize {
    type Err = ParseWidgetSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "small" | "s" => Ok(WidgetSize::Small),
            "medium" | "m" => Ok(WidgetSize::Medium),
            "large" | "l" => Ok(WidgetSize::Large),
            "extra_large" | "xl" => Ok(WidgetSize::ExtraLarge),
            _ => Err(ParseWidgetSizeError(s.to_string())),
        }
    }
}

/// Value kind of a configurable setting, with its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    /// Integer within `min..=max`, adjusted in `step` increments
    Number {
        /// Lower bound (inclusive)
        min: i64,
        /// Upper bound (inclusive)
        max: i64,
        /// Increment used by the settings panel
        step: i64,
        /// Default value
        default: i64,
    },
    /// On/off switch
    Toggle {
        /// Default value
        default: bool,
    },
    /// One of a fixed list of strings
    Choice {
        /// Allowed values
        options: &'static [&'static str],
        /// Default value
        default: &'static str,
    },
    /// Free text
    Text {
        /// Default value
        default: &'static str,
    },
}

/// One entry of a widget's settings schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingField {
    /// Key in the settings map
    pub key: &'static str,
    /// Translation key of the field label
    pub label_key: &'static str,
    /// Value kind and default
    pub kind: SettingKind,
}

impl SettingField {
    /// The field's default as a JSON value.
    pub fn default_value(&self) -> Value {
        match self.kind {
            SettingKind::Number { default, .. } => Value::from(default),
            SettingKind::Toggle { default } => Value::Bool(default),
            SettingKind::Choice { default, .. } | SettingKind::Text { default } => {
                Value::from(default)
            }
        }
    }
}

/// Static description of a widget type.
///
/// Definitions are `'static` and never mutated at runtime.
pub struct WidgetDefinition {
    /// Type this definition describes
    pub widget_type: WidgetType,
    /// Translation key of the widget title
    pub title_key: &'static str,
    /// Size used when the widget is added
    pub default_size: WidgetSize,
    /// Sizes the widget may be resized to, smallest first
    pub available_sizes: &'static [WidgetSize],
    /// Configurable settings
    pub settings_schema: &'static [SettingField],
    /// Rendering component factory
    pub factory: WidgetFactory,
}

impl WidgetDefinition {
    /// Whether `size` is one of the available sizes.
    pub fn allows(&self, size: WidgetSize) -> bool {
        self.available_sizes.contains(&size)
    }

    /// Settings a freshly added widget starts with.
    pub fn default_settings(&self) -> Settings {
        self.settings_schema
            .iter()
            .map(|f| (f.key.to_string(), f.default_value()))
            .collect()
    }

    /// Schema entry for `key`.
    pub fn field(&self, key: &str) -> Option<&'static SettingField> {
        self.settings_schema.iter().find(|f| f.key == key)
    }

    /// The next larger (`grow`) or smaller available size after `current`.
    pub fn step_size(&self, current: WidgetSize, grow: bool) -> Option<WidgetSize> {
        let idx = self.available_sizes.iter().position(|s| *s == current)?;
        if grow {
            self.available_sizes.get(idx + 1).copied()
        } else {
            idx.checked_sub(1).and_then(|i| self.available_sizes.get(i).copied())
        }
    }
}

impl fmt::Debug for WidgetDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetDefinition")
            .field("widget_type", &self.widget_type)
            .field("title_key", &self.title_key)
            .field("default_size", &self.default_size)
            .field("available_sizes", &self.available_sizes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_type_roundtrips_through_str() {
        for t in WidgetType::ALL {
            assert_eq!(t.as_str().parse::<WidgetType>(), Ok(t));
        }
    }

    #[test]
    fn test_widget_type_accepts_kebab_case() {
        assert_eq!("task-list".parse::<WidgetType>(), Ok(WidgetType::TaskList));
        assert_eq!(" Site_Weather ".parse::<WidgetType>(), Ok(WidgetType::SiteWeather));
    }

    #[test]
    fn test_widget_type_rejects_unknown() {
        let err = "gantt_chart".parse::<WidgetType>().expect_err("unknown");
        assert_eq!(err.to_string(), "unknown widget type: gantt_chart");
    }

    #[test]
    fn test_widget_type_serializes_snake_case() {
        let json = serde_json::to_string(&WidgetType::UpcomingDeadlines).expect("serialize");
        assert_eq!(json, "\"upcoming_deadlines\"");
    }

    #[test]
    fn test_size_dimensions_roundtrip() {
        for s in WidgetSize::ALL {
            let (w, h) = s.dimensions();
            assert_eq!(WidgetSize::from_dimensions(w, h), Some(s));
        }
        assert_eq!(WidgetSize::from_dimensions(4, 2), None);
    }

    #[test]
    fn test_size_covering_picks_smallest_fit() {
        assert_eq!(WidgetSize::covering(1, 1), Some(WidgetSize::Small));
        assert_eq!(WidgetSize::covering(4, 1), Some(WidgetSize::Medium));
        assert_eq!(WidgetSize::covering(3, 3), Some(WidgetSize::Large));
        assert_eq!(WidgetSize::covering(7, 2), Some(WidgetSize::ExtraLarge));
        assert_eq!(WidgetSize::covering(13, 1), None);
        assert_eq!(WidgetSize::covering(1, 5), None);
    }

    #[test]
    fn test_size_parse_aliases() {
        assert_eq!("xl".parse::<WidgetSize>(), Ok(WidgetSize::ExtraLarge));
        assert_eq!("extra-large".parse::<WidgetSize>(), Ok(WidgetSize::ExtraLarge));
        assert_eq!("M".parse::<WidgetSize>(), Ok(WidgetSize::Medium));
        assert!("huge".parse::<WidgetSize>().is_err());
    }

    #[test]
    fn test_setting_field_default_values() {
        let number = SettingField {
            key: "limit",
            label_key: "settings.limit",
            kind: SettingKind::Number {
                min: 1,
                max: 20,
                step: 1,
                default: 5,
            },
        };
        assert_eq!(number.default_value(), Value::from(5));

        let toggle = SettingField {
            key: "show_completed",
            label_key: "settings.show_completed",
            kind: SettingKind::Toggle { default: false },
        };
        assert_eq!(toggle.default_value(), Value::Bool(false));
    }
}
