//! Per-user dashboard layout.
//!
//! A [`Layout`] is the ordered set of [`WidgetInstance`]s placed on a
//! 12-column grid. [`LayoutManager`] owns one user's layout, validates every
//! mutation against the widget registry and the grid bounds, and writes the
//! result to a [`Storage`](buildtrack_storage::Storage) backend.

pub mod grid;
pub mod manager;
pub mod model;

pub use grid::{GridBounds, Position, DEFAULT_MAX_ROWS};
pub use manager::{
    default_layout, layout_key, validate_instance, LayoutManager, LAYOUT_KEY_PREFIX,
};
pub use model::{Layout, LayoutError, WidgetFlags, WidgetInstance};
