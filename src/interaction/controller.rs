//! Drag/resize gesture state machine.
//!
//! ```text
//! Idle -> Dragging -> Idle   (Up commits the snapped position)
//! Idle -> Resizing -> Idle   (Up commits the covering size)
//!      \-> Idle              (Cancel, or edit mode left mid-gesture)
//! ```
//!
//! The controller never mutates the layout while a gesture is in progress;
//! `Move` only produces a preview. The mutation happens once, on `Up`,
//! through [`LayoutManager`] so that every drop is validated like any other
//! edit.

use buildtrack_storage::Storage;

use super::geometry::GridGeometry;
use crate::layout::{LayoutError, LayoutManager, Position};
use crate::widgets::WidgetSize;

/// A pointer location in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPosition {
    /// Terminal column
    pub column: u16,
    /// Terminal row
    pub row: u16,
}

impl PointerPosition {
    /// Creates a pointer position.
    pub const fn new(column: u16, row: u16) -> Self {
        Self { column, row }
    }
}

/// Pointer input fed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Primary button pressed
    Down(PointerPosition),
    /// Pointer moved with the button held
    Move(PointerPosition),
    /// Primary button released
    Up(PointerPosition),
    /// Gesture aborted (Esc, focus lost)
    Cancel,
}

/// Kind of an active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Moving a widget
    Drag,
    /// Changing a widget's size
    Resize,
}

/// Controller state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GestureState {
    /// No gesture in progress
    #[default]
    Idle,
    /// A widget is being moved
    Dragging {
        /// Widget being moved
        id: String,
        /// Pointer offset from the frame's top-left corner, in terminal cells
        grab_column: u16,
        /// Pointer offset from the frame's top-left corner, in terminal rows
        grab_row: u16,
        /// Snapped placement the widget would be dropped at
        preview: Position,
    },
    /// A widget is being resized from its bottom-right corner
    Resizing {
        /// Widget being resized
        id: String,
        /// Placement with the size the widget would be resized to
        preview: Position,
    },
}

impl GestureState {
    /// Id of the widget under an active gesture.
    pub fn active_id(&self) -> Option<&str> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging { id, .. } | GestureState::Resizing { id, .. } => Some(id),
        }
    }

    /// Preview placement of an active gesture.
    pub fn preview(&self) -> Option<Position> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging { preview, .. } | GestureState::Resizing { preview, .. } => {
                Some(*preview)
            }
        }
    }
}

/// Why an input produced no transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The dashboard is not in edit mode
    EditModeOff,
    /// Pointer down on empty grid space
    NoWidgetUnderPointer,
    /// Pointer down on a locked widget
    WidgetLocked,
    /// Another gesture is already active
    GestureInProgress,
    /// Move, Up or Cancel without an active gesture
    NoActiveGesture,
    /// Keyboard nudge against the grid edge
    AtGridEdge,
    /// Keyboard size step past the smallest or largest available size
    NoFurtherSize,
}

/// Outcome of one controller step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureEffect {
    /// A gesture began on `id`
    Started {
        /// Widget picked up
        id: String,
        /// Drag or resize
        kind: GestureKind,
    },
    /// The preview placement changed
    Preview {
        /// Widget under the gesture
        id: String,
        /// Snapped placement
        position: Position,
    },
    /// The layout accepted the change
    Committed {
        /// Widget changed
        id: String,
        /// Its new placement
        position: Position,
    },
    /// The layout rejected the change; nothing was mutated
    Rejected {
        /// Widget targeted
        id: String,
        /// Validation failure
        error: LayoutError,
    },
    /// The gesture was abandoned; nothing was mutated
    Canceled {
        /// Widget that was under the gesture
        id: String,
    },
    /// The input was ignored
    Ignored(IgnoreReason),
}

/// Translates pointer gestures and edit-mode keys into layout mutations.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: GestureState,
}

impl DragController {
    /// Creates an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Whether a drag or resize is in progress.
    pub fn is_active(&self) -> bool {
        self.state != GestureState::Idle
    }

    /// Drops any active gesture without touching the layout.
    pub fn reset(&mut self) -> Option<GestureEffect> {
        match std::mem::take(&mut self.state) {
            GestureState::Idle => None,
            GestureState::Dragging { id, .. } | GestureState::Resizing { id, .. } => {
                tracing::debug!(widget_id = %id, "gesture reset");
                Some(GestureEffect::Canceled { id })
            }
        }
    }

    /// Feeds one pointer event.
    ///
    /// Outside edit mode the controller is inert: events are ignored and a
    /// gesture left over from edit mode is canceled.
    pub fn handle<S: Storage>(
        &mut self,
        event: PointerEvent,
        manager: &mut LayoutManager<S>,
        geometry: &GridGeometry,
    ) -> GestureEffect {
        if !manager.is_edit_mode() {
            return self
                .reset()
                .unwrap_or(GestureEffect::Ignored(IgnoreReason::EditModeOff));
        }

        match event {
            PointerEvent::Down(at) => self.pointer_down(at, manager, geometry),
            PointerEvent::Move(at) => self.pointer_move(at, manager, geometry),
            PointerEvent::Up(at) => self.pointer_up(at, manager, geometry),
            PointerEvent::Cancel => self
                .reset()
                .unwrap_or(GestureEffect::Ignored(IgnoreReason::NoActiveGesture)),
        }
    }

    fn pointer_down<S: Storage>(
        &mut self,
        at: PointerPosition,
        manager: &LayoutManager<S>,
        geometry: &GridGeometry,
    ) -> GestureEffect {
        if self.is_active() {
            return GestureEffect::Ignored(IgnoreReason::GestureInProgress);
        }
        let Some(widget) = geometry.widget_at(manager.widgets(), at.column, at.row) else {
            return GestureEffect::Ignored(IgnoreReason::NoWidgetUnderPointer);
        };
        if widget.flags.locked {
            return GestureEffect::Ignored(IgnoreReason::WidgetLocked);
        }

        let id = widget.id.clone();
        let kind = if geometry.is_resize_handle(widget, at.column, at.row) {
            self.state = GestureState::Resizing {
                id: id.clone(),
                preview: widget.position,
            };
            GestureKind::Resize
        } else {
            let frame = geometry.cell_rect(widget.position);
            self.state = GestureState::Dragging {
                id: id.clone(),
                grab_column: at.column.saturating_sub(frame.x),
                grab_row: at.row.saturating_sub(frame.y),
                preview: widget.position,
            };
            GestureKind::Drag
        };
        tracing::debug!(widget_id = %id, ?kind, "gesture started");
        GestureEffect::Started { id, kind }
    }

    fn pointer_move<S: Storage>(
        &mut self,
        at: PointerPosition,
        manager: &LayoutManager<S>,
        geometry: &GridGeometry,
    ) -> GestureEffect {
        let Some(target) = self.target_position(at, manager, geometry) else {
            return GestureEffect::Ignored(IgnoreReason::NoActiveGesture);
        };
        match &mut self.state {
            GestureState::Idle => GestureEffect::Ignored(IgnoreReason::NoActiveGesture),
            GestureState::Dragging { id, preview, .. } | GestureState::Resizing { id, preview } => {
                *preview = target;
                GestureEffect::Preview {
                    id: id.clone(),
                    position: target,
                }
            }
        }
    }

    fn pointer_up<S: Storage>(
        &mut self,
        at: PointerPosition,
        manager: &mut LayoutManager<S>,
        geometry: &GridGeometry,
    ) -> GestureEffect {
        let target = self.target_position(at, manager, geometry);
        let state = std::mem::take(&mut self.state);
        let (id, result) = match (state, target) {
            (GestureState::Idle, _) => {
                return GestureEffect::Ignored(IgnoreReason::NoActiveGesture)
            }
            (GestureState::Dragging { id, .. } | GestureState::Resizing { id, .. }, None) => {
                let error = LayoutError::WidgetNotFound(id.clone());
                (id, Err(error))
            }
            (GestureState::Dragging { id, .. }, Some(position)) => {
                let result = manager.update_widget_position(&id, position);
                (id, result.map(|()| position))
            }
            (GestureState::Resizing { id, .. }, Some(position)) => {
                let result = WidgetSize::from_dimensions(position.w, position.h)
                    .ok_or(LayoutError::InvalidDimensions {
                        w: position.w,
                        h: position.h,
                    })
                    .and_then(|size| manager.resize_widget(&id, size))
                    .map(|()| position);
                (id, result)
            }
        };

        match result {
            Ok(position) => {
                tracing::debug!(widget_id = %id, %position, "gesture committed");
                GestureEffect::Committed { id, position }
            }
            Err(error) => {
                tracing::debug!(widget_id = %id, error = %error, "gesture rejected");
                GestureEffect::Rejected { id, error }
            }
        }
    }

    /// Snapped placement for the active gesture with the pointer at `at`.
    ///
    /// `None` when idle or when the widget has disappeared from the layout.
    fn target_position<S: Storage>(
        &self,
        at: PointerPosition,
        manager: &LayoutManager<S>,
        geometry: &GridGeometry,
    ) -> Option<Position> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Dragging {
                id,
                grab_column,
                grab_row,
                ..
            } => {
                let current = manager.widget(id)?.position;
                let left = at.column as i32 - *grab_column as i32;
                let top = at.row as i32 - *grab_row as i32;
                let (x, y) = geometry.snap_origin(left, top, current.w, current.h);
                Some(Position::new(x, y, current.w, current.h))
            }
            GestureState::Resizing { id, .. } => {
                let current = manager.widget(id)?.position;
                let (w, h) = geometry.snap_span(current, at.column, at.row);
                let (max_w, max_h) = WidgetSize::ExtraLarge.dimensions();
                let size = WidgetSize::covering(w.min(max_w), h.min(max_h))?;
                Some(Position::with_size(current.x, current.y, size))
            }
        }
    }

    /// Moves widget `id` by whole cells (keyboard arrows).
    pub fn nudge<S: Storage>(
        &self,
        manager: &mut LayoutManager<S>,
        id: &str,
        dx: i32,
        dy: i32,
    ) -> GestureEffect {
        if let Some(ignored) = self.keyboard_guard(manager) {
            return ignored;
        }
        let Some(current) = manager.widget(id).map(|w| w.position) else {
            return GestureEffect::Rejected {
                id: id.to_string(),
                error: LayoutError::WidgetNotFound(id.to_string()),
            };
        };
        let (x, y) = manager.bounds().clamp_origin(
            current.x as i32 + dx,
            current.y as i32 + dy,
            current.w,
            current.h,
        );
        if (x, y) == (current.x, current.y) {
            return GestureEffect::Ignored(IgnoreReason::AtGridEdge);
        }
        let position = Position::new(x, y, current.w, current.h);
        Self::commit(id, manager.update_widget_position(id, position), position)
    }

    /// Steps widget `id` to its next larger or smaller available size
    /// (keyboard `+`/`-`).
    pub fn step_size<S: Storage>(
        &self,
        manager: &mut LayoutManager<S>,
        id: &str,
        grow: bool,
    ) -> GestureEffect {
        if let Some(ignored) = self.keyboard_guard(manager) {
            return ignored;
        }
        let Some((current_size, origin)) = manager.widget(id).map(|w| (w.size, w.position)) else {
            return GestureEffect::Rejected {
                id: id.to_string(),
                error: LayoutError::WidgetNotFound(id.to_string()),
            };
        };
        let definition = match manager.definition_for(id) {
            Ok(definition) => definition,
            Err(error) => {
                return GestureEffect::Rejected {
                    id: id.to_string(),
                    error,
                }
            }
        };
        let Some(size) = definition.step_size(current_size, grow) else {
            return GestureEffect::Ignored(IgnoreReason::NoFurtherSize);
        };
        let position = Position::with_size(origin.x, origin.y, size);
        Self::commit(id, manager.resize_widget(id, size), position)
    }

    fn keyboard_guard<S: Storage>(&self, manager: &LayoutManager<S>) -> Option<GestureEffect> {
        if !manager.is_edit_mode() {
            return Some(GestureEffect::Ignored(IgnoreReason::EditModeOff));
        }
        if self.is_active() {
            return Some(GestureEffect::Ignored(IgnoreReason::GestureInProgress));
        }
        None
    }

    fn commit(id: &str, result: Result<(), LayoutError>, position: Position) -> GestureEffect {
        match result {
            Ok(()) => GestureEffect::Committed {
                id: id.to_string(),
                position,
            },
            Err(error) => GestureEffect::Rejected {
                id: id.to_string(),
                error,
            },
        }
    }
}
