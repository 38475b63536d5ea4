//! Event handling for the TUI.
//!
//! Wraps crossterm events and adds a tick variant for periodic UI refresh.
//! Key presses are mapped to [`Action`]s according to the active overlay and
//! whether the dashboard is in edit mode.

use crate::tui::app::{App, Overlay};
use crate::widgets::{SettingKind, WidgetType};
use buildtrack_storage::Storage;
use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::interval;

/// Application-level event variants.
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Mouse input (click, drag, release).
    Mouse(MouseEvent),
    /// The terminal lost focus.
    FocusLost,
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI refresh.
    Tick,
}

/// Event handler that merges terminal input events with periodic ticks.
pub struct EventHandler {
    /// Tick interval duration.
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a new EventHandler with the specified tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Waits for the next event, returning either a terminal event or a tick.
    ///
    /// Uses `tokio::select!` to race between crossterm input and the tick timer.
    pub async fn next(&self, reader: &mut EventStream) -> std::io::Result<Event> {
        let mut tick = interval(self.tick_rate);
        // Consume the first immediate tick
        tick.tick().await;

        loop {
            tokio::select! {
                maybe_event = reader.next() => {
                    match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind != KeyEventKind::Release => {
                            return Ok(Event::Key(key))
                        }
                        Some(Ok(CrosstermEvent::Mouse(mouse))) => return Ok(Event::Mouse(mouse)),
                        Some(Ok(CrosstermEvent::FocusLost)) => return Ok(Event::FocusLost),
                        Some(Ok(CrosstermEvent::Resize(w, h))) => return Ok(Event::Resize(w, h)),
                        Some(Err(e)) => return Err(e),
                        // Ignore key releases, focus gained, paste
                        Some(Ok(_)) => continue,
                        None => return Err(std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "event stream ended",
                        )),
                    }
                }
                _ = tick.tick() => {
                    return Ok(Event::Tick);
                }
            }
        }
    }
}

/// Action produced by handling a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action to take.
    None,
    /// Quit the application.
    Quit,
    /// Enter or leave edit mode.
    ToggleEditMode,
    /// Open the add-widget picker.
    OpenAddWidget,
    /// Add a widget of the given type.
    AddWidget(WidgetType),
    /// Remove the selected widget.
    RemoveSelected,
    /// Open the settings panel of the selected widget.
    OpenSettings,
    /// Write the settings draft back to the layout.
    SaveSettings,
    /// Close the open overlay without changes.
    CloseOverlay,
    /// Move the selected widget by whole cells.
    Nudge {
        /// Columns to move (negative is left)
        dx: i32,
        /// Rows to move (negative is up)
        dy: i32,
    },
    /// Step the selected widget to its next larger (`true`) or smaller size.
    StepSize(bool),
    /// Flip the `visible` flag of the selected widget.
    ToggleHidden,
    /// Flip the `locked` flag of the selected widget.
    ToggleLocked,
    /// Re-render the selected widget (all failed widgets if none is selected).
    Retry,
    /// Abandon the running drag or resize gesture.
    CancelGesture,
}

/// Handles a key event by dispatching to the appropriate app method or action.
///
/// Open overlays take the keys first. Selection and in-panel editing are
/// applied directly; anything that mutates the layout is returned as an
/// [`Action`] for [`App::apply_action`].
pub fn handle_key_event<S: Storage>(app: &mut App<S>, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match app.overlay {
        Overlay::Settings(_) => return handle_settings_key(app, key),
        Overlay::AddWidget { .. } => return handle_add_widget_key(app, key),
        Overlay::None => {}
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('e') => Action::ToggleEditMode,
        KeyCode::Tab => {
            app.select_next();
            Action::None
        }
        KeyCode::BackTab => {
            app.select_previous();
            Action::None
        }
        KeyCode::Char('r') => Action::Retry,
        KeyCode::Esc if app.drag.is_active() => Action::CancelGesture,
        KeyCode::Esc => {
            app.selected = None;
            Action::None
        }
        _ if app.manager.is_edit_mode() => handle_edit_key(key),
        _ => Action::None,
    }
}

/// Keys that only mean something in edit mode.
fn handle_edit_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('a') => Action::OpenAddWidget,
        KeyCode::Char('d') | KeyCode::Delete => Action::RemoveSelected,
        KeyCode::Char('s') => Action::OpenSettings,
        KeyCode::Left => Action::Nudge { dx: -1, dy: 0 },
        KeyCode::Right => Action::Nudge { dx: 1, dy: 0 },
        KeyCode::Up => Action::Nudge { dx: 0, dy: -1 },
        KeyCode::Down => Action::Nudge { dx: 0, dy: 1 },
        KeyCode::Char('+') | KeyCode::Char('=') => Action::StepSize(true),
        KeyCode::Char('-') => Action::StepSize(false),
        KeyCode::Char('h') => Action::ToggleHidden,
        KeyCode::Char('l') => Action::ToggleLocked,
        _ => Action::None,
    }
}

/// Keys while the add-widget picker is open.
fn handle_add_widget_key<S: Storage>(app: &mut App<S>, key: KeyEvent) -> Action {
    let types = app.manager.registry().available_types();
    let Overlay::AddWidget { selected } = &mut app.overlay else {
        return Action::None;
    };
    match key.code {
        KeyCode::Esc => Action::CloseOverlay,
        KeyCode::Char('j') | KeyCode::Down => {
            if !types.is_empty() {
                *selected = (*selected + 1) % types.len();
            }
            Action::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if !types.is_empty() {
                *selected = (*selected + types.len() - 1) % types.len();
            }
            Action::None
        }
        KeyCode::Enter => types
            .get(*selected)
            .map_or(Action::None, |t| Action::AddWidget(*t)),
        _ => Action::None,
    }
}

/// Keys while the settings panel is open.
///
/// On a text field printable characters are typed into the draft, so only
/// the arrow keys and Tab move between fields there.
fn handle_settings_key<S: Storage>(app: &mut App<S>, key: KeyEvent) -> Action {
    let Overlay::Settings(panel) = &mut app.overlay else {
        return Action::None;
    };
    let on_text = matches!(
        panel.selected_field().map(|f| &f.field.kind),
        Some(SettingKind::Text { .. })
    );

    match key.code {
        KeyCode::Esc => return Action::CloseOverlay,
        KeyCode::Enter => return Action::SaveSettings,
        KeyCode::Down | KeyCode::Tab => panel.select_next(),
        KeyCode::Up | KeyCode::BackTab => panel.select_previous(),
        KeyCode::Backspace if on_text => {
            panel.pop_char();
        }
        KeyCode::Char(c) if on_text => {
            panel.push_char(c);
        }
        KeyCode::Char('j') => panel.select_next(),
        KeyCode::Char('k') => panel.select_previous(),
        KeyCode::Char('h') | KeyCode::Left => panel.decrement(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(' ') => panel.increment(),
        _ => {}
    }
    Action::None
}

/// Returns true if the key event should trigger application quit.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q'))
        || (key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c')))
}
