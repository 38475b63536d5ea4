use super::*;
use crate::interaction::GestureState;
use crate::layout::{GridBounds, Position};
use crate::widgets::WidgetSize;
use crossterm::event::KeyModifiers;
use ratatui::layout::Rect;

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn down(column: u16, row: u16) -> MouseEvent {
    mouse(MouseEventKind::Down(MouseButton::Left), column, row)
}

fn drag(column: u16, row: u16) -> MouseEvent {
    mouse(MouseEventKind::Drag(MouseButton::Left), column, row)
}

fn up(column: u16, row: u16) -> MouseEvent {
    mouse(MouseEventKind::Up(MouseButton::Left), column, row)
}

/// App as after rendering into a 120x40 terminal: grid at rows 1..39,
/// 10 terminal columns and 3 rows per cell.
fn rendered_app() -> App<MemoryStorage> {
    let mut app = make_app();
    app.geometry = Some(GridGeometry::for_area(
        Rect::new(0, 1, 120, 38),
        GridBounds::default(),
        3,
    ));
    app
}

#[test]
fn test_mouse_ignored_before_first_render() {
    let mut app = make_app();
    app.apply_action(Action::ToggleEditMode);
    app.handle_mouse_event(down(5, 3));
    assert!(app.selected.is_none());
    assert!(!app.drag.is_active());
}

#[test]
fn test_click_selects_widget_in_view_mode() {
    let mut app = rendered_app();
    app.handle_mouse_event(down(70, 2));
    assert_eq!(app.selected, Some(id_of(&app, WidgetType::TaskList)));
    assert!(!app.drag.is_active());

    // Empty space clears the selection.
    app.handle_mouse_event(down(100, 30));
    assert!(app.selected.is_none());
}

#[test]
fn test_drag_outside_edit_mode_never_mutates_layout() {
    let mut app = rendered_app();
    let before = app.manager.layout().clone();
    app.handle_mouse_event(down(5, 3));
    app.handle_mouse_event(drag(35, 12));
    app.handle_mouse_event(up(35, 12));
    assert_eq!(app.manager.layout(), &before);
}

#[test]
fn test_drag_and_drop_moves_widget() {
    let mut app = rendered_app();
    app.apply_action(Action::ToggleEditMode);
    let id = id_of(&app, WidgetType::ProjectOverview);

    app.handle_mouse_event(down(5, 3));
    assert_eq!(app.selected, Some(id.clone()));
    app.handle_mouse_event(drag(35, 12));
    assert_eq!(
        app.drag.state().preview(),
        Some(Position::new(3, 3, 6, 2))
    );
    // Nothing moves until the drop.
    assert_eq!(
        app.manager.widget(&id).expect("widget").position,
        Position::new(0, 0, 6, 2)
    );

    app.handle_mouse_event(up(35, 12));
    assert!(!app.drag.is_active());
    assert_eq!(
        app.manager.widget(&id).expect("widget").position,
        Position::new(3, 3, 6, 2)
    );
}

#[test]
fn test_drop_past_grid_edge_is_clamped() {
    let mut app = rendered_app();
    app.apply_action(Action::ToggleEditMode);
    let id = id_of(&app, WidgetType::ProjectOverview);

    app.handle_mouse_event(down(5, 3));
    app.handle_mouse_event(up(119, 3));
    assert_eq!(
        app.manager.widget(&id).expect("widget").position,
        Position::new(6, 0, 6, 2)
    );
}

#[test]
fn test_resize_handle_drag_changes_size() {
    let mut app = rendered_app();
    app.apply_action(Action::ToggleEditMode);
    let id = id_of(&app, WidgetType::TaskList);

    // Task list frame: columns 60..120, rows 1..7; handle at (119, 6).
    app.handle_mouse_event(down(119, 6));
    assert!(matches!(app.drag.state(), GestureState::Resizing { .. }));
    app.handle_mouse_event(up(119, 12));

    let widget = app.manager.widget(&id).expect("widget");
    assert_eq!(widget.size, WidgetSize::Large);
    assert_eq!(widget.position, Position::new(6, 0, 6, 4));
}

#[test]
fn test_resize_to_unavailable_size_is_rejected() {
    let mut app = rendered_app();
    app.apply_action(Action::ToggleEditMode);
    let id = id_of(&app, WidgetType::BudgetSummary);

    // Budget frame: columns 0..30, rows 7..13. Widening to 12 columns asks
    // for extra_large, which budget summaries don't offer.
    app.handle_mouse_event(down(29, 12));
    app.handle_mouse_event(up(119, 12));

    let widget = app.manager.widget(&id).expect("widget");
    assert_eq!(widget.size, WidgetSize::Small);
    assert!(app.status_message.is_some());
}

#[test]
fn test_locked_widget_is_not_picked_up() {
    let mut app = rendered_app();
    app.apply_action(Action::ToggleEditMode);
    app.selected = Some(id_of(&app, WidgetType::ProjectOverview));
    app.apply_action(Action::ToggleLocked);

    app.handle_mouse_event(down(5, 3));
    assert!(!app.drag.is_active());
}

#[test]
fn test_focus_lost_cancels_gesture() {
    let mut app = rendered_app();
    app.apply_action(Action::ToggleEditMode);
    let id = id_of(&app, WidgetType::ProjectOverview);

    app.handle_mouse_event(down(5, 3));
    app.handle_mouse_event(drag(35, 12));
    app.handle_focus_lost();
    assert!(!app.drag.is_active());

    app.handle_mouse_event(up(35, 12));
    assert_eq!(
        app.manager.widget(&id).expect("widget").position,
        Position::new(0, 0, 6, 2)
    );
}

#[test]
fn test_leaving_edit_mode_mid_drag_cancels() {
    let mut app = rendered_app();
    app.apply_action(Action::ToggleEditMode);
    let id = id_of(&app, WidgetType::ProjectOverview);

    app.handle_mouse_event(down(5, 3));
    app.apply_action(Action::ToggleEditMode);
    app.handle_mouse_event(up(35, 12));

    assert!(!app.drag.is_active());
    assert_eq!(
        app.manager.widget(&id).expect("widget").position,
        Position::new(0, 0, 6, 2)
    );
}
