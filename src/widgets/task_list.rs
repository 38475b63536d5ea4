//! Task list widget: open tasks across all projects, soonest due first.

use super::{
    setting_bool, setting_u64, truncate, RenderError, SettingField, SettingKind, Widget,
    WidgetContext, WidgetDefinition, WidgetProps, WidgetSize, WidgetType,
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const DEFAULT_LIMIT: i64 = 5;

/// Registry definition.
pub static DEFINITION: WidgetDefinition = WidgetDefinition {
    widget_type: WidgetType::TaskList,
    title_key: "widgets.task_list.title",
    default_size: WidgetSize::Medium,
    available_sizes: &[WidgetSize::Small, WidgetSize::Medium, WidgetSize::Large],
    settings_schema: &[
        SettingField {
            key: "limit",
            label_key: "settings.limit",
            kind: SettingKind::Number {
                min: 1,
                max: 20,
                step: 1,
                default: DEFAULT_LIMIT,
            },
        },
        SettingField {
            key: "show_completed",
            label_key: "settings.show_completed",
            kind: SettingKind::Toggle { default: false },
        },
    ],
    factory: create,
};

/// Task list component.
#[derive(Debug, Default)]
pub struct TaskListWidget;

fn create() -> Box<dyn Widget> {
    Box::new(TaskListWidget)
}

impl Widget for TaskListWidget {
    fn render(
        &self,
        props: &WidgetProps<'_>,
        context: &WidgetContext<'_>,
    ) -> Result<Vec<Line<'static>>, RenderError> {
        let limit = setting_u64(props.settings, "limit", DEFAULT_LIMIT as u64)? as usize;
        let show_completed = setting_bool(props.settings, "show_completed", false)?;
        let width = props.width as usize;

        let tasks = context.data.tasks_by_due(show_completed);
        if tasks.is_empty() {
            return Ok(vec![Line::raw(context.t("tasks.empty").to_string())]);
        }

        Ok(tasks
            .into_iter()
            .take(limit)
            .map(|task| {
                let (mark, style) = if task.completed {
                    ("[x]", Style::default().add_modifier(Modifier::DIM))
                } else if task.due < context.data.today {
                    ("[ ]", Style::default().fg(Color::Red))
                } else {
                    ("[ ]", Style::default())
                };
                let due = task.due.format("%b %d").to_string();
                let text = format!("{} {} · {} ({})", mark, task.title, task.project_id, due);
                Line::from(Span::styled(truncate(&text, width), style))
            })
            .collect())
    }

    fn widget_type(&self) -> WidgetType {
        WidgetType::TaskList
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DemoData;
    use crate::i18n::Translator;
    use crate::widgets::Settings;
    use chrono::NaiveDate;
    use serde_json::json;

    fn render_with(settings: Settings) -> Vec<String> {
        let data = DemoData::sample(NaiveDate::from_ymd_opt(2026, 10, 16).expect("date"));
        let translator = Translator::default();
        let ctx = WidgetContext::new(&data, &translator);
        let props = WidgetProps {
            id: "task_list-1",
            title: "Tasks",
            settings: &settings,
            is_edit_mode: false,
            width: 80,
            height: 10,
        };
        TaskListWidget
            .render(&props, &ctx)
            .expect("render")
            .iter()
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn test_limit_caps_rows() {
        let lines = render_with(json!({"limit": 3}).as_object().cloned().expect("object"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_default_hides_completed_and_sorts_by_due() {
        let lines = render_with(Settings::new());
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.starts_with("[ ]")));
        assert!(lines[0].contains("Footing rebar sign-off"));
    }

    #[test]
    fn test_show_completed_includes_done_tasks() {
        let lines = render_with(
            json!({"limit": 20, "show_completed": true})
                .as_object()
                .cloned()
                .expect("object"),
        );
        assert!(lines.iter().any(|l| l.starts_with("[x]")));
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_invalid_limit_is_render_error() {
        let data = DemoData::sample(NaiveDate::from_ymd_opt(2026, 10, 16).expect("date"));
        let translator = Translator::default();
        let ctx = WidgetContext::new(&data, &translator);
        let settings = json!({"limit": -1}).as_object().cloned().expect("object");
        let props = WidgetProps {
            id: "task_list-1",
            title: "Tasks",
            settings: &settings,
            is_edit_mode: false,
            width: 80,
            height: 10,
        };
        assert!(TaskListWidget.render(&props, &ctx).is_err());
    }
}
