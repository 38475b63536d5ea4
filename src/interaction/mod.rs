//! Edit-mode interaction: pointer gestures and keyboard moves.
//!
//! [`DragController`] is a small state machine fed with [`PointerEvent`]s in
//! terminal coordinates. [`GridGeometry`] maps those coordinates onto grid
//! cells for the frame the pointer acted on.

mod controller;
mod geometry;

pub use controller::{
    DragController, GestureEffect, GestureKind, GestureState, IgnoreReason, PointerEvent,
    PointerPosition,
};
pub use geometry::GridGeometry;
