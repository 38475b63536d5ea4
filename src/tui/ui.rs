//! Main rendering orchestration for the TUI dashboard.
//!
//! Provides the top-level `render_dashboard` function that composes the
//! header, the widget grid, the footer and any open overlay.

use crate::interaction::GridGeometry;
use crate::layout::WidgetInstance;
use crate::settings_panel::SettingsPanel;
use crate::tui::app::{App, Overlay};
use crate::widgets::{RenderError, WidgetContext, WidgetProps};
use buildtrack_storage::Storage;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;

/// Glyph drawn on the resize-handle cell of each movable widget in edit mode.
pub const RESIZE_HANDLE: &str = "◢";

/// Renders the full dashboard: header, widget grid, footer and overlays.
///
/// Updates `app.geometry` with the grid geometry of this frame so mouse
/// events can be mapped back onto grid cells.
pub fn render_dashboard<S: Storage>(frame: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(1),    // grid
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    let geometry = GridGeometry::for_area(chunks[1], app.manager.bounds(), app.row_height);
    app.geometry = Some(geometry);
    render_grid(frame, app, &geometry);

    render_footer(frame, app, chunks[2]);

    match &app.overlay {
        Overlay::None => {}
        Overlay::AddWidget { selected } => render_add_widget(frame, app, *selected),
        Overlay::Settings(panel) => render_settings(frame, app, panel),
    }
}

/// Header with title and user (left) and the mode tag (right-aligned).
fn render_header<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let t = &app.translator;
    let title = t.t("dashboard.title");
    let user = format!("  {} ({})", app.session.name, app.session.role);
    let (mode, mode_style) = if app.manager.is_edit_mode() {
        (
            format!("[{}]", t.t("dashboard.mode.edit")),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            format!("[{}]", t.t("dashboard.mode.view")),
            Style::default().fg(Color::DarkGray),
        )
    };

    let used = title.chars().count() + user.chars().count() + mode.chars().count();
    let padding = (area.width as usize).saturating_sub(used);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(title, Style::default().fg(Color::Cyan)),
        Span::raw(user),
        Span::raw(" ".repeat(padding)),
        Span::styled(mode, mode_style),
    ]));
    frame.render_widget(header, area);
}

/// Draws every visible widget into its grid cells, then the drag preview.
fn render_grid<S: Storage>(frame: &mut Frame, app: &mut App<S>, geometry: &GridGeometry) {
    let widgets: Vec<WidgetInstance> = app.visible_widgets().into_iter().cloned().collect();
    if widgets.is_empty() {
        let empty = Paragraph::new(app.translator.t("dashboard.empty"))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        let area = geometry.area;
        let middle = Rect {
            y: area.y + area.height / 2,
            height: area.height.min(1),
            ..area
        };
        frame.render_widget(empty, middle);
        return;
    }

    for widget in &widgets {
        render_widget_frame(frame, app, geometry, widget);
    }

    if app.manager.is_edit_mode() {
        if let Some(preview) = app.drag.state().preview() {
            let rect = geometry.cell_rect(preview);
            let outline = Block::bordered()
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Yellow))
                .title(Line::from(format!(" {preview} ")));
            frame.render_widget(outline, rect);
        }
    }
}

/// Draws one widget: frame, title, content (or its error box), handle.
fn render_widget_frame<S: Storage>(
    frame: &mut Frame,
    app: &mut App<S>,
    geometry: &GridGeometry,
    widget: &WidgetInstance,
) {
    let rect = geometry.cell_rect(widget.position);
    if rect.is_empty() {
        return;
    }
    // Unregistered types render nothing.
    let Some(definition) = app.manager.registry().get(widget.widget_type) else {
        return;
    };

    let t = app.translator;
    let edit = app.manager.is_edit_mode();
    let selected = app.selected.as_deref() == Some(widget.id.as_str());
    let hidden = !widget.flags.visible;

    let title = t.t(definition.title_key);
    let mut title_spans = vec![Span::raw(format!(" {title} "))];
    if edit && hidden {
        title_spans.push(Span::styled(
            format!("[{}] ", t.t("widget.hidden")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if edit && widget.flags.locked {
        title_spans.push(Span::styled(
            format!("[{}] ", t.t("widget.locked")),
            Style::default().fg(Color::Magenta),
        ));
    }

    let border_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if edit && hidden {
        Style::default().fg(Color::DarkGray)
    } else if edit {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let block = Block::bordered()
        .title(Line::from(title_spans))
        .border_style(border_style);
    let inner = block.inner(rect);
    frame.render_widget(Clear, rect);
    frame.render_widget(block, rect);

    match widget_content(app, widget, title, inner) {
        Ok(lines) => {
            let mut content = Paragraph::new(lines);
            if edit && hidden {
                content = content.style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::DIM),
                );
            }
            frame.render_widget(content, inner);
        }
        Err(error) => {
            if !app.render_errors.contains_key(&widget.id) {
                tracing::warn!(widget_id = %widget.id, %error, "widget failed to render");
                app.render_errors.insert(widget.id.clone(), error.clone());
            }
            frame.render_widget(error_box(app, &error), inner);
        }
    }

    if edit && !widget.flags.locked && rect.width > 0 && rect.height > 0 {
        let corner = (rect.right() - 1, rect.bottom() - 1);
        if let Some(cell) = frame.buffer_mut().cell_mut(corner) {
            cell.set_symbol(RESIZE_HANDLE).set_fg(Color::Yellow);
        }
    }
}

/// Content lines of a widget, or the remembered failure until it is retried.
fn widget_content<S: Storage>(
    app: &App<S>,
    widget: &WidgetInstance,
    title: &str,
    inner: Rect,
) -> Result<Vec<Line<'static>>, RenderError> {
    if let Some(error) = app.render_errors.get(&widget.id) {
        return Err(error.clone());
    }
    let Some(component) = app.manager.registry().create(widget.widget_type) else {
        return Ok(Vec::new());
    };
    let props = WidgetProps {
        id: &widget.id,
        title,
        settings: &widget.settings,
        is_edit_mode: app.manager.is_edit_mode(),
        width: inner.width,
        height: inner.height,
    };
    let context = WidgetContext::new(&app.data, &app.translator);
    let mut lines = component.render(&props, &context)?;
    lines.truncate(inner.height as usize);
    Ok(lines)
}

/// Error boundary shown in place of a widget whose render failed.
fn error_box<S: Storage>(app: &App<S>, error: &RenderError) -> Paragraph<'static> {
    let t = &app.translator;
    Paragraph::new(vec![
        Line::from(Span::styled(
            format!("⚠ {}", t.t("widget.error")),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(error.to_string(), Style::default().fg(Color::Red))),
        Line::from(Span::styled(
            t.t("widget.retry_hint").to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
}

/// Footer: the status message while it is live, otherwise the key hints of
/// the current mode.
fn render_footer<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let line = match &app.status_message {
        Some((msg, expiry)) if Instant::now() < *expiry => Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(Color::Yellow),
        )),
        _ => {
            let key = match (&app.overlay, app.manager.is_edit_mode()) {
                (Overlay::Settings(_), _) => "dashboard.settings.footer",
                (_, true) => "dashboard.footer.edit",
                (_, false) => "dashboard.footer.view",
            };
            Line::from(Span::styled(
                app.translator.t(key),
                Style::default().fg(Color::DarkGray),
            ))
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Widget type picker listing every registered type with its default size.
fn render_add_widget<S: Storage>(frame: &mut Frame, app: &App<S>, selected: usize) {
    let registry = app.manager.registry();
    let lines: Vec<Line> = registry
        .available_types()
        .into_iter()
        .filter_map(|t| registry.get(t))
        .enumerate()
        .map(|(i, def)| {
            let label = format!(
                "{} {} ({})",
                if i == selected { ">" } else { " " },
                app.translator.t(def.title_key),
                def.default_size
            );
            if i == selected {
                Line::from(Span::styled(
                    label,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::raw(label)
            }
        })
        .collect();

    let area = centered_rect(44, lines.len() as u16 + 2, frame.area());
    let popup = Paragraph::new(lines).block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .title(format!(" {} ", app.translator.t("dashboard.add_widget"))),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// Settings editor: one `label: value` row per field, changed fields marked.
fn render_settings<S: Storage>(frame: &mut Frame, app: &App<S>, panel: &SettingsPanel) {
    let t = &app.translator;
    let lines: Vec<Line> = panel
        .fields()
        .iter()
        .enumerate()
        .map(|(i, draft)| {
            let is_selected = i == panel.selected();
            let label = format!(
                "{} {}: {}{}",
                if is_selected { ">" } else { " " },
                t.t(draft.field.label_key),
                draft.display_value(),
                if draft.is_changed() { " *" } else { "" }
            );
            if is_selected {
                Line::from(Span::styled(
                    label,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::raw(label)
            }
        })
        .collect();

    let widget_title = app
        .manager
        .registry()
        .get(panel.widget_type())
        .map_or(panel.widget_id(), |def| t.t(def.title_key));
    let area = centered_rect(48, lines.len().max(1) as u16 + 2, frame.area());
    let popup = Paragraph::new(lines).block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .title(format!(" {}: {} ", t.t("dashboard.settings"), widget_title)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// A `width` x `height` rectangle centered in `area`, clipped to it.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_utils::{find_row_with_text, make_app, row_text, test_terminal};
    use crate::widgets::WidgetType;
    use serde_json::json;

    fn draw<S: Storage>(app: &mut App<S>, width: u16, height: u16) -> ratatui::buffer::Buffer {
        let mut terminal = test_terminal(width, height);
        terminal
            .draw(|frame| render_dashboard(frame, app))
            .expect("draw");
        terminal.backend().buffer().clone()
    }

    #[test]
    fn test_header_shows_title_user_and_mode() {
        let mut app = make_app();
        let buffer = draw(&mut app, 120, 40);
        let header = row_text(&buffer, 0);
        assert!(header.contains("BuildTrack Dashboard"));
        assert!(header.contains("Ana García"));
        assert!(header.trim_end().ends_with("[VIEW]"));

        app.manager.set_edit_mode(true);
        let buffer = draw(&mut app, 120, 40);
        assert!(row_text(&buffer, 0).trim_end().ends_with("[EDIT]"));
    }

    #[test]
    fn test_default_layout_titles_on_grid_rows() {
        let mut app = make_app();
        let buffer = draw(&mut app, 120, 40);
        // Grid starts below the header; 3 terminal rows per grid row.
        let first = row_text(&buffer, 1);
        assert!(first.contains("Project Overview"));
        assert!(first.contains("Tasks"));
        let third = row_text(&buffer, 7);
        assert!(third.contains("Budget"));
        assert!(third.contains("Upcoming Deadlines"));
    }

    #[test]
    fn test_render_stores_geometry() {
        let mut app = make_app();
        assert!(app.geometry.is_none());
        draw(&mut app, 120, 40);
        let geometry = app.geometry.expect("geometry after render");
        assert_eq!(geometry.area, Rect::new(0, 1, 120, 38));
        assert_eq!(geometry.row_height, 3);
    }

    #[test]
    fn test_footer_follows_mode() {
        let mut app = make_app();
        let buffer = draw(&mut app, 120, 40);
        assert!(row_text(&buffer, 39).contains("[e] Edit"));

        app.manager.set_edit_mode(true);
        let buffer = draw(&mut app, 120, 40);
        assert!(row_text(&buffer, 39).contains("[a] Add"));
    }

    #[test]
    fn test_status_message_replaces_footer() {
        let mut app = make_app();
        app.set_status("widget is locked: budget_summary-3");
        let buffer = draw(&mut app, 120, 40);
        assert!(row_text(&buffer, 39).contains("widget is locked"));
    }

    #[test]
    fn test_hidden_widget_skipped_in_view_mode_and_tagged_in_edit_mode() {
        let mut app = make_app();
        let id = app
            .manager
            .widgets()
            .iter()
            .find(|w| w.widget_type == WidgetType::BudgetSummary)
            .map(|w| w.id.clone())
            .expect("budget widget");
        let mut flags = app.manager.widget(&id).expect("widget").flags;
        flags.visible = false;
        app.manager.set_widget_flags(&id, flags).expect("flags");

        let buffer = draw(&mut app, 120, 40);
        assert!(find_row_with_text(&buffer, "Budget").is_none());

        app.manager.set_edit_mode(true);
        let buffer = draw(&mut app, 120, 40);
        let row = find_row_with_text(&buffer, "Budget").expect("budget drawn in edit mode");
        assert!(row_text(&buffer, row).contains("[hidden]"));
    }

    #[test]
    fn test_resize_handle_only_in_edit_mode() {
        let mut app = make_app();
        let buffer = draw(&mut app, 120, 40);
        assert!(find_row_with_text(&buffer, RESIZE_HANDLE).is_none());

        app.manager.set_edit_mode(true);
        let buffer = draw(&mut app, 120, 40);
        // Project overview spans columns 0..60 and grid rows 0..2.
        let cell = buffer.cell((59, 6)).expect("corner cell");
        assert_eq!(cell.symbol(), RESIZE_HANDLE);
    }

    #[test]
    fn test_failed_widget_shows_error_box_until_retried() {
        let mut app = make_app();
        let id = app
            .manager
            .widgets()
            .iter()
            .find(|w| w.widget_type == WidgetType::ProjectOverview)
            .map(|w| w.id.clone())
            .expect("overview widget");
        let mut partial = crate::widgets::Settings::new();
        partial.insert("project_id".to_string(), json!("P-999"));
        app.manager
            .update_widget_settings(&id, partial)
            .expect("settings");

        let buffer = draw(&mut app, 120, 40);
        assert!(find_row_with_text(&buffer, "failed to render").is_some());
        assert!(app.render_errors.contains_key(&id));

        // Fixing the data alone doesn't re-render; a retry does.
        let mut partial = crate::widgets::Settings::new();
        partial.insert("project_id".to_string(), json!("P-100"));
        app.manager
            .update_widget_settings(&id, partial)
            .expect("settings");
        let buffer = draw(&mut app, 120, 40);
        assert!(find_row_with_text(&buffer, "failed to render").is_some());

        app.selected = Some(id.clone());
        app.apply_action(crate::tui::event::Action::Retry);
        let buffer = draw(&mut app, 120, 40);
        assert!(find_row_with_text(&buffer, "failed to render").is_none());
        assert!(find_row_with_text(&buffer, "Harbor View Offices").is_some());
    }

    #[test]
    fn test_empty_layout_shows_hint() {
        let mut app = make_app();
        let ids: Vec<String> = app.manager.widgets().iter().map(|w| w.id.clone()).collect();
        for id in ids {
            app.manager.remove_widget(&id).expect("remove");
        }
        let buffer = draw(&mut app, 120, 40);
        assert!(find_row_with_text(&buffer, "No widgets yet").is_some());
    }

    #[test]
    fn test_add_widget_overlay_lists_types() {
        let mut app = make_app();
        app.manager.set_edit_mode(true);
        app.overlay = Overlay::AddWidget { selected: 1 };
        let buffer = draw(&mut app, 120, 40);
        assert!(find_row_with_text(&buffer, "Add widget").is_some());
        let row = find_row_with_text(&buffer, "> Tasks (medium)").expect("selected entry");
        assert!(row > 0);
        assert!(find_row_with_text(&buffer, "Site Weather (small)").is_some());
    }

    #[test]
    fn test_settings_overlay_marks_changed_fields() {
        let mut app = make_app();
        app.manager.set_edit_mode(true);
        let id = app
            .manager
            .widgets()
            .iter()
            .find(|w| w.widget_type == WidgetType::TaskList)
            .map(|w| w.id.clone())
            .expect("task list");
        let mut panel = SettingsPanel::open(&app.manager, &id).expect("open");
        panel.increment();
        app.overlay = Overlay::Settings(panel);

        let buffer = draw(&mut app, 120, 40);
        assert!(find_row_with_text(&buffer, "Widget settings: Tasks").is_some());
        assert!(find_row_with_text(&buffer, "> Items shown: 6 *").is_some());
        assert!(row_text(&buffer, 39).contains("[Enter] Save"));
    }

    #[test]
    fn test_spanish_labels() {
        let mut app = make_app();
        app.translator = crate::i18n::Translator::new(crate::i18n::Locale::Es);
        let buffer = draw(&mut app, 120, 40);
        assert!(row_text(&buffer, 0).contains("Panel de BuildTrack"));
        assert!(row_text(&buffer, 1).contains("Tareas"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut app = make_app();
        app.manager.set_edit_mode(true);
        app.overlay = Overlay::AddWidget { selected: 0 };
        draw(&mut app, 10, 3);
    }
}
