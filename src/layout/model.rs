//! Layout data model: placed widgets and the per-user layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::{GridBounds, Position};
use crate::widgets::{Settings, WidgetSize, WidgetType};

/// Flags shown on a widget's frame in edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetFlags {
    /// Hidden widgets are skipped outside edit mode
    pub visible: bool,
    /// Locked widgets can't be moved or resized
    pub locked: bool,
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self {
            visible: true,
            locked: false,
        }
    }
}

/// A widget placed on a user's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetInstance {
    /// Unique within the layout, e.g. `task_list-3`
    pub id: String,
    /// Widget kind
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    /// Placement in grid cells; `w`/`h` always match `size`
    pub position: Position,
    /// Size class
    pub size: WidgetSize,
    /// Free-form per-widget settings
    #[serde(default)]
    pub settings: Settings,
    /// Edit-mode flags
    #[serde(default)]
    pub flags: WidgetFlags,
}

/// The set of all widget instances of one user's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Owner
    pub user_id: String,
    /// Placed widgets in insertion order; later entries draw on top
    pub widgets: Vec<WidgetInstance>,
    /// Sequence number for the next widget id
    pub next_seq: u64,
    /// Time of the last mutation
    pub updated_at: DateTime<Utc>,
}

impl Layout {
    /// Creates an empty layout for `user_id`.
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            widgets: Vec::new(),
            next_seq: 1,
            updated_at: Utc::now(),
        }
    }

    /// Looks up a widget by id.
    pub fn get(&self, id: &str) -> Option<&WidgetInstance> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut WidgetInstance> {
        self.widgets.iter_mut().find(|w| w.id == id)
    }

    /// Number of placed widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether no widgets are placed.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// First free row below all widgets (0 for an empty layout).
    pub fn bottom(&self) -> u16 {
        self.widgets
            .iter()
            .map(|w| w.position.bottom())
            .max()
            .unwrap_or(0)
            .min(u16::MAX as u32) as u16
    }

    /// Widgets sorted top-to-bottom, left-to-right (keyboard navigation order).
    pub fn reading_order(&self) -> Vec<&WidgetInstance> {
        let mut ordered: Vec<&WidgetInstance> = self.widgets.iter().collect();
        ordered.sort_by_key(|w| (w.position.y, w.position.x));
        ordered
    }

    /// Allocates the next widget id for `widget_type`.
    pub(crate) fn next_id(&mut self, widget_type: WidgetType) -> String {
        let id = format!("{}-{}", widget_type, self.next_seq);
        self.next_seq += 1;
        id
    }
}

/// Reasons a layout mutation is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// No widget with this id exists in the layout.
    #[error("widget not found: {0}")]
    WidgetNotFound(String),

    /// The widget type has no registered definition.
    #[error("unknown widget type: {0}")]
    UnknownWidgetType(String),

    /// The size is not among the type's available sizes.
    #[error("size {size} is not available for {widget_type} widgets")]
    SizeNotAllowed {
        /// Widget type
        widget_type: WidgetType,
        /// Rejected size
        size: WidgetSize,
    },

    /// The placement leaves the grid.
    #[error("position {position} is outside the {bounds} grid")]
    OutOfBounds {
        /// Rejected placement
        position: Position,
        /// Grid extent
        bounds: GridBounds,
    },

    /// Width and height don't correspond to any size class.
    #[error("{w}x{h} does not match any widget size")]
    InvalidDimensions {
        /// Requested width
        w: u16,
        /// Requested height
        h: u16,
    },

    /// The widget is locked against moves and resizes.
    #[error("widget {0} is locked")]
    Locked(String),

    /// No room left below the existing widgets.
    #[error("no room for another widget (grid has {max_rows} rows)")]
    LayoutFull {
        /// Grid height
        max_rows: u16,
    },
}
