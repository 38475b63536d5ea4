//! Mapping between grid cells and terminal cells.

use ratatui::layout::{Position as ScreenPosition, Rect};

use crate::layout::{GridBounds, Position, WidgetInstance};

/// Screen geometry of the grid for one rendered frame.
///
/// Columns are `cell_width` terminal columns wide (fractional, so the grid
/// always spans the full area width); rows are `row_height` terminal rows
/// tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    /// Screen area the grid is drawn in
    pub area: Rect,
    /// Grid extent in cells
    pub bounds: GridBounds,
    /// Terminal columns per grid column
    pub cell_width: f32,
    /// Terminal rows per grid row
    pub row_height: u16,
}

impl GridGeometry {
    /// Geometry of a grid filling `area`.
    pub fn for_area(area: Rect, bounds: GridBounds, row_height: u16) -> Self {
        let columns = bounds.columns.max(1);
        Self {
            area,
            bounds,
            cell_width: area.width as f32 / columns as f32,
            row_height: row_height.max(1),
        }
    }

    /// Screen rectangle of a grid placement, clipped to the grid area.
    pub fn cell_rect(&self, position: Position) -> Rect {
        let left = self.column_offset(position.x);
        let right = self.column_offset(position.x.saturating_add(position.w));
        let top = position.y as u32 * self.row_height as u32;
        let height = position.h as u32 * self.row_height as u32;
        let unclipped = Rect {
            x: self.area.x.saturating_add(left),
            y: self.area.y.saturating_add(top.min(u16::MAX as u32) as u16),
            width: right.saturating_sub(left),
            height: height.min(u16::MAX as u32) as u16,
        };
        unclipped.intersection(self.area)
    }

    /// Topmost widget whose frame contains the screen cell `(column, row)`.
    ///
    /// Widgets later in the list draw on top of earlier ones.
    pub fn widget_at<'a>(
        &self,
        widgets: &'a [WidgetInstance],
        column: u16,
        row: u16,
    ) -> Option<&'a WidgetInstance> {
        let point = ScreenPosition::new(column, row);
        widgets
            .iter()
            .rev()
            .find(|w| self.cell_rect(w.position).contains(point))
    }

    /// Whether `(column, row)` is the bottom-right corner of the widget's
    /// frame, where the resize handle sits.
    pub fn is_resize_handle(&self, widget: &WidgetInstance, column: u16, row: u16) -> bool {
        let rect = self.cell_rect(widget.position);
        !rect.is_empty()
            && column == rect.right().saturating_sub(1)
            && row == rect.bottom().saturating_sub(1)
    }

    /// Grid origin for a widget whose frame's top-left corner is dragged to
    /// the screen cell `(left, top)`, snapped to the nearest cell and clamped
    /// into the grid.
    pub fn snap_origin(&self, left: i32, top: i32, w: u16, h: u16) -> (u16, u16) {
        let dx = (left - self.area.x as i32) as f32 / self.cell_width;
        let dy = (top - self.area.y as i32) as f32 / self.row_height as f32;
        self.bounds
            .clamp_origin(dx.round() as i32, dy.round() as i32, w, h)
    }

    /// Cell span requested by a resize handle dragged to `(column, row)` for
    /// a widget at `origin`, at least 1×1 and at most the grid extent.
    pub fn snap_span(&self, origin: Position, column: u16, row: u16) -> (u16, u16) {
        let edge_x = (column as f32 + 1.0 - self.area.x as f32) / self.cell_width;
        let edge_y = (row as f32 + 1.0 - self.area.y as f32) / self.row_height as f32;
        let w = (edge_x.round() as i32 - origin.x as i32).clamp(1, self.bounds.columns as i32);
        let h = (edge_y.round() as i32 - origin.y as i32).clamp(1, self.bounds.max_rows as i32);
        (w as u16, h as u16)
    }

    fn column_offset(&self, column: u16) -> u16 {
        let offset = (column as f32 * self.cell_width).round();
        offset.clamp(0.0, u16::MAX as f32) as u16
    }
}
