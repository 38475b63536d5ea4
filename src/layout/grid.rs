//! Grid coordinates and bounds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::widgets::WidgetSize;
use crate::GRID_COLUMNS;

/// Default number of grid rows a layout may use.
pub const DEFAULT_MAX_ROWS: u16 = 24;

/// Placement of a widget on the grid, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Left column
    pub x: u16,
    /// Top row
    pub y: u16,
    /// Width in columns
    pub w: u16,
    /// Height in rows
    pub h: u16,
}

impl Position {
    /// Creates a position from its four components.
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Position at `(x, y)` with the dimensions of `size`.
    pub const fn with_size(x: u16, y: u16, size: WidgetSize) -> Self {
        let (w, h) = size.dimensions();
        Self { x, y, w, h }
    }

    /// One past the right-most column.
    pub fn right(&self) -> u32 {
        self.x as u32 + self.w as u32
    }

    /// One past the bottom-most row.
    pub fn bottom(&self) -> u32 {
        self.y as u32 + self.h as u32
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.w, self.h)
    }
}

/// Extent of the dashboard grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    /// Number of columns
    pub columns: u16,
    /// Number of rows
    pub max_rows: u16,
}

impl GridBounds {
    /// Creates bounds of `columns`×`max_rows` cells.
    pub const fn new(columns: u16, max_rows: u16) -> Self {
        Self { columns, max_rows }
    }

    /// Whether `position` is non-empty and lies fully inside the grid.
    pub fn contains(&self, position: &Position) -> bool {
        position.w > 0
            && position.h > 0
            && position.right() <= self.columns as u32
            && position.bottom() <= self.max_rows as u32
    }

    /// Clamps a (possibly negative) origin so that a `w`×`h` widget stays
    /// inside the grid.
    pub fn clamp_origin(&self, x: i32, y: i32, w: u16, h: u16) -> (u16, u16) {
        let max_x = self.columns.saturating_sub(w) as i32;
        let max_y = self.max_rows.saturating_sub(h) as i32;
        (x.clamp(0, max_x) as u16, y.clamp(0, max_y) as u16)
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::new(GRID_COLUMNS, DEFAULT_MAX_ROWS)
    }
}

impl fmt::Display for GridBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.max_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_accepts_edge_placements() {
        let bounds = GridBounds::new(12, 24);
        assert!(bounds.contains(&Position::new(0, 0, 12, 4)));
        assert!(bounds.contains(&Position::new(9, 22, 3, 2)));
    }

    #[test]
    fn test_contains_rejects_overflow_and_empty() {
        let bounds = GridBounds::new(12, 24);
        assert!(!bounds.contains(&Position::new(10, 0, 3, 2)));
        assert!(!bounds.contains(&Position::new(0, 23, 3, 2)));
        assert!(!bounds.contains(&Position::new(0, 0, 0, 2)));
        assert!(!bounds.contains(&Position::new(u16::MAX, 0, 3, 2)));
    }

    #[test]
    fn test_clamp_origin() {
        let bounds = GridBounds::new(12, 24);
        assert_eq!(bounds.clamp_origin(-4, -1, 3, 2), (0, 0));
        assert_eq!(bounds.clamp_origin(11, 30, 3, 2), (9, 22));
        assert_eq!(bounds.clamp_origin(5, 5, 3, 2), (5, 5));
    }

    #[test]
    fn test_with_size_uses_size_dimensions() {
        assert_eq!(
            Position::with_size(2, 3, WidgetSize::Large),
            Position::new(2, 3, 6, 4)
        );
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(1, 2, 3, 4).to_string(), "1,2 3x4");
    }
}
