pub(crate) use super::*;
pub(crate) use crate::tui::test_utils::make_app;
pub(crate) use crate::widgets::WidgetType;
pub(crate) use buildtrack_storage::MemoryStorage;

mod interaction;

/// Id of the first widget of `widget_type` in the app's layout.
pub(crate) fn id_of(app: &App<MemoryStorage>, widget_type: WidgetType) -> String {
    app.manager
        .widgets()
        .iter()
        .find(|w| w.widget_type == widget_type)
        .map(|w| w.id.clone())
        .expect("widget in default layout")
}

/// App in edit mode with `widget_type` selected.
pub(crate) fn editing(widget_type: WidgetType) -> App<MemoryStorage> {
    let mut app = make_app();
    app.apply_action(Action::ToggleEditMode);
    app.selected = Some(id_of(&app, widget_type));
    app
}
