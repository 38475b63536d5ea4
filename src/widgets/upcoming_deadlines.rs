//! Upcoming deadlines widget: open tasks due within `days_ahead` days,
//! overdue ones first.

use super::{
    setting_u64, truncate, RenderError, SettingField, SettingKind, Widget, WidgetContext,
    WidgetDefinition, WidgetProps, WidgetSize, WidgetType,
};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

const DEFAULT_DAYS_AHEAD: i64 = 14;

/// Registry definition.
pub static DEFINITION: WidgetDefinition = WidgetDefinition {
    widget_type: WidgetType::UpcomingDeadlines,
    title_key: "widgets.upcoming_deadlines.title",
    default_size: WidgetSize::Small,
    available_sizes: &[WidgetSize::Small, WidgetSize::Medium, WidgetSize::Large],
    settings_schema: &[SettingField {
        key: "days_ahead",
        label_key: "settings.days_ahead",
        kind: SettingKind::Number {
            min: 1,
            max: 90,
            step: 7,
            default: DEFAULT_DAYS_AHEAD,
        },
    }],
    factory: create,
};

/// Upcoming deadlines component.
#[derive(Debug, Default)]
pub struct UpcomingDeadlinesWidget;

fn create() -> Box<dyn Widget> {
    Box::new(UpcomingDeadlinesWidget)
}

impl Widget for UpcomingDeadlinesWidget {
    fn render(
        &self,
        props: &WidgetProps<'_>,
        context: &WidgetContext<'_>,
    ) -> Result<Vec<Line<'static>>, RenderError> {
        let days_ahead =
            setting_u64(props.settings, "days_ahead", DEFAULT_DAYS_AHEAD as u64)? as i64;
        let width = props.width as usize;
        let data = context.data;

        let lines: Vec<Line<'static>> = data
            .tasks_by_due(false)
            .into_iter()
            .filter(|t| data.days_until(t.due) <= days_ahead)
            .map(|t| {
                let days = data.days_until(t.due);
                let (when, style) = match days {
                    d if d < 0 => (
                        context.t("deadlines.overdue").to_string(),
                        Style::default().fg(Color::Red),
                    ),
                    0 => (
                        context.t("deadlines.today").to_string(),
                        Style::default().fg(Color::Yellow),
                    ),
                    d => (format!("{}d", d), Style::default()),
                };
                Line::from(vec![
                    Span::styled(format!("{:>4} ", when), style),
                    Span::raw(truncate(&t.title, width.saturating_sub(5))),
                ])
            })
            .collect();

        if lines.is_empty() {
            return Ok(vec![Line::raw(context.t("deadlines.empty").to_string())]);
        }
        Ok(lines)
    }

    fn widget_type(&self) -> WidgetType {
        WidgetType::UpcomingDeadlines
    }
}
