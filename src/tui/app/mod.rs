//! Application state and main event loop for the TUI.
//!
//! Manages terminal setup/teardown, panic hooks, and the core render loop.
//! The layout itself lives in the [`LayoutManager`]; the app adds the
//! session-only state around it: selection, the open overlay, the drag
//! controller and the widgets whose last render failed.

use crate::auth::Session;
use crate::data::DemoData;
use crate::i18n::Translator;
use crate::interaction::{DragController, GestureEffect, GridGeometry, PointerEvent, PointerPosition};
use crate::layout::{LayoutManager, WidgetInstance};
use crate::settings_panel::SettingsPanel;
use crate::tui::event::{handle_key_event, Action, Event, EventHandler};
use crate::tui::ui::render_dashboard;
use crate::widgets::RenderError;
use buildtrack_storage::Storage;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        EventStream,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::collections::HashMap;
use std::io::{self, stdout};
use std::time::{Duration, Instant};

/// How long a status message stays in the footer.
pub const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Modal overlay drawn above the grid.
#[derive(Debug, Clone, Default)]
pub enum Overlay {
    /// Nothing open.
    #[default]
    None,
    /// Widget type picker; `selected` indexes `WidgetRegistry::available_types`.
    AddWidget {
        /// Highlighted entry
        selected: usize,
    },
    /// Settings editor of one widget.
    Settings(SettingsPanel),
}

/// Core application state for the TUI.
#[derive(Debug)]
pub struct App<S: Storage> {
    /// Whether the application should exit.
    pub should_quit: bool,
    /// Count of ticks processed (useful for testing/diagnostics).
    pub tick_count: u64,
    /// Layout of the logged-in user.
    pub manager: LayoutManager<S>,
    /// Logged-in user.
    pub session: Session,
    /// Label lookup for the active locale.
    pub translator: Translator,
    /// Project data the widgets display.
    pub data: DemoData,
    /// Pointer gesture state machine.
    pub drag: DragController,
    /// Open overlay, if any.
    pub overlay: Overlay,
    /// Id of the selected widget.
    pub selected: Option<String>,
    /// Widgets whose last render failed, kept until retried.
    pub render_errors: HashMap<String, RenderError>,
    /// Temporary status message shown in footer, with expiry time.
    pub status_message: Option<(String, Instant)>,
    /// Grid geometry of the last rendered frame.
    ///
    /// `None` until the first render. Mouse events are mapped through it.
    pub geometry: Option<GridGeometry>,
    /// Terminal rows per grid row.
    pub row_height: u16,
    /// Redraw interval when idle.
    pub tick_rate: Duration,
}

impl<S: Storage> App<S> {
    /// Creates an app for `session` over an already loaded layout.
    ///
    /// Widgets render the demo data as of today.
    pub fn new(manager: LayoutManager<S>, session: Session, translator: Translator) -> Self {
        Self {
            should_quit: false,
            tick_count: 0,
            manager,
            session,
            translator,
            data: DemoData::sample(chrono::Local::now().date_naive()),
            drag: DragController::new(),
            overlay: Overlay::None,
            selected: None,
            render_errors: HashMap::new(),
            status_message: None,
            geometry: None,
            row_height: 3,
            tick_rate: Duration::from_millis(250),
        }
    }

    /// Widgets drawn in the current mode, in draw order (later on top).
    ///
    /// Hidden widgets are only drawn (dimmed) in edit mode.
    pub fn visible_widgets(&self) -> Vec<&WidgetInstance> {
        let edit = self.manager.is_edit_mode();
        self.manager
            .widgets()
            .iter()
            .filter(|w| edit || w.flags.visible)
            .collect()
    }

    /// The selected widget, if it still exists.
    pub fn selected_widget(&self) -> Option<&WidgetInstance> {
        self.selected.as_deref().and_then(|id| self.manager.widget(id))
    }

    /// Moves the selection to the next drawn widget in reading order,
    /// wrapping around.
    pub fn select_next(&mut self) {
        self.step_selection(true);
    }

    /// Moves the selection to the previous drawn widget, wrapping around.
    pub fn select_previous(&mut self) {
        self.step_selection(false);
    }

    fn step_selection(&mut self, forward: bool) {
        let edit = self.manager.is_edit_mode();
        let ids: Vec<String> = self
            .manager
            .layout()
            .reading_order()
            .into_iter()
            .filter(|w| edit || w.flags.visible)
            .map(|w| w.id.clone())
            .collect();
        if ids.is_empty() {
            self.selected = None;
            return;
        }
        let current = self
            .selected
            .as_ref()
            .and_then(|id| ids.iter().position(|i| i == id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => ids.len() - 1,
            (Some(i), true) => (i + 1) % ids.len(),
            (Some(i), false) => (i + ids.len() - 1) % ids.len(),
        };
        self.selected = Some(ids[next].clone());
    }

    /// Shows `message` in the footer for [`STATUS_MESSAGE_TTL`].
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now() + STATUS_MESSAGE_TTL));
    }

    /// Clears the status message if its expiry time has passed.
    pub fn expire_status_message(&mut self) {
        if let Some((_, expiry)) = &self.status_message {
            if Instant::now() >= *expiry {
                self.status_message = None;
            }
        }
    }

    /// Applies an action produced by [`handle_key_event`].
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Quit => self.should_quit = true,
            Action::ToggleEditMode => self.toggle_edit_mode(),
            Action::OpenAddWidget => {
                if self.manager.is_edit_mode() {
                    self.overlay = Overlay::AddWidget { selected: 0 };
                }
            }
            Action::AddWidget(widget_type) => {
                self.overlay = Overlay::None;
                match self.manager.add_widget(widget_type) {
                    Ok(id) => self.selected = Some(id),
                    Err(e) => self.set_status(e.to_string()),
                }
            }
            Action::RemoveSelected => {
                let Some(id) = self.selected.take() else {
                    return;
                };
                match self.manager.remove_widget(&id) {
                    Ok(_) => {
                        self.render_errors.remove(&id);
                    }
                    Err(e) => self.set_status(e.to_string()),
                }
            }
            Action::OpenSettings => {
                let Some(id) = self.selected.clone() else {
                    return;
                };
                match SettingsPanel::open(&self.manager, &id) {
                    Ok(panel) => self.overlay = Overlay::Settings(panel),
                    Err(e) => self.set_status(e.to_string()),
                }
            }
            Action::SaveSettings => {
                if let Overlay::Settings(panel) = std::mem::take(&mut self.overlay) {
                    let id = panel.widget_id().to_string();
                    match panel.apply(&mut self.manager) {
                        Ok(changes) if changes.is_empty() => {}
                        Ok(_) => {
                            // New settings may fix a failed render.
                            self.render_errors.remove(&id);
                        }
                        Err(e) => self.set_status(e.to_string()),
                    }
                }
            }
            Action::CloseOverlay => {
                if let Overlay::Settings(panel) = std::mem::take(&mut self.overlay) {
                    panel.cancel();
                }
            }
            Action::Nudge { dx, dy } => {
                if let Some(id) = self.selected.clone() {
                    let effect = self.drag.nudge(&mut self.manager, &id, dx, dy);
                    self.report(effect);
                }
            }
            Action::StepSize(grow) => {
                if let Some(id) = self.selected.clone() {
                    let effect = self.drag.step_size(&mut self.manager, &id, grow);
                    self.report(effect);
                }
            }
            Action::ToggleHidden => self.update_flags(|flags| flags.visible = !flags.visible),
            Action::ToggleLocked => self.update_flags(|flags| flags.locked = !flags.locked),
            Action::Retry => match self.selected.as_deref() {
                Some(id) => {
                    self.render_errors.remove(id);
                }
                None => self.render_errors.clear(),
            },
            Action::CancelGesture => {
                if let Some(effect) = self.drag.reset() {
                    self.report(effect);
                }
            }
        }
    }

    /// Enters or leaves edit mode.
    ///
    /// Leaving drops the running gesture and closes any overlay; a hidden
    /// widget that was selected is deselected because it is no longer drawn.
    fn toggle_edit_mode(&mut self) {
        if self.manager.toggle_edit_mode() {
            return;
        }
        self.drag.reset();
        self.overlay = Overlay::None;
        if self.selected_widget().is_some_and(|w| !w.flags.visible) {
            self.selected = None;
        }
    }

    fn update_flags(&mut self, change: impl FnOnce(&mut crate::layout::WidgetFlags)) {
        let Some(widget) = self.selected_widget() else {
            return;
        };
        let id = widget.id.clone();
        let mut flags = widget.flags;
        change(&mut flags);
        if let Err(e) = self.manager.set_widget_flags(&id, flags) {
            self.set_status(e.to_string());
        }
    }

    /// Surfaces rejected gestures in the footer.
    fn report(&mut self, effect: GestureEffect) {
        match effect {
            GestureEffect::Rejected { error, .. } => self.set_status(error.to_string()),
            GestureEffect::Committed { id, position } => {
                tracing::debug!(widget_id = %id, %position, "widget placed");
            }
            _ => {}
        }
    }

    /// Handles a mouse event.
    ///
    /// A left click selects the widget under the pointer. In edit mode the
    /// press, drag and release of the left button also drive the
    /// [`DragController`].
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let Some(geometry) = self.geometry else {
            return;
        };
        let at = PointerPosition {
            column: mouse.column,
            row: mouse.row,
        };
        let event = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.select_at(&geometry, at);
                PointerEvent::Down(at)
            }
            MouseEventKind::Drag(MouseButton::Left) => PointerEvent::Move(at),
            MouseEventKind::Up(MouseButton::Left) => PointerEvent::Up(at),
            _ => return,
        };
        if !self.manager.is_edit_mode() {
            return;
        }
        let effect = self.drag.handle(event, &mut self.manager, &geometry);
        self.report(effect);
    }

    /// Cancels a running gesture when the terminal loses focus.
    pub fn handle_focus_lost(&mut self) {
        if let Some(geometry) = self.geometry {
            if self.drag.is_active() {
                let effect = self.drag.handle(PointerEvent::Cancel, &mut self.manager, &geometry);
                self.report(effect);
            }
        }
    }

    fn select_at(&mut self, geometry: &GridGeometry, at: PointerPosition) {
        let drawn: Vec<WidgetInstance> = self.visible_widgets().into_iter().cloned().collect();
        self.selected = geometry
            .widget_at(&drawn, at.column, at.row)
            .map(|w| w.id.clone());
    }

    /// Runs the TUI application: sets up terminal, enters event loop, restores on exit.
    pub async fn run(&mut self) -> io::Result<()> {
        // Install panic hook that restores terminal before printing panic info
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        setup_terminal()?;

        let result = self.event_loop().await;

        restore_terminal()?;
        result
    }

    /// Main event loop: renders UI and processes events.
    async fn event_loop(&mut self) -> io::Result<()> {
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;
        let event_handler = EventHandler::new(self.tick_rate);
        let mut reader = EventStream::new();

        terminal.draw(|frame| render_dashboard(frame, self))?;

        loop {
            let event = event_handler.next(&mut reader).await?;
            let should_render = match event {
                Event::Key(key) => {
                    let action = handle_key_event(self, key);
                    self.apply_action(action);
                    if self.should_quit {
                        return Ok(());
                    }
                    true
                }
                Event::Mouse(mouse) => {
                    self.handle_mouse_event(mouse);
                    true
                }
                Event::FocusLost => {
                    self.handle_focus_lost();
                    true
                }
                Event::Tick => {
                    self.tick_count += 1;
                    let had_message = self.status_message.is_some();
                    self.expire_status_message();
                    had_message && self.status_message.is_none()
                }
                Event::Resize(_, _) => true,
            };

            if should_render {
                terminal.draw(|frame| render_dashboard(frame, self))?;
            }
        }
    }
}

/// Enables raw mode and switches to the alternate screen.
fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(
        stdout(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    Ok(())
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    Ok(())
}

#[cfg(test)]
mod tests;
