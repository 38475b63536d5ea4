//! Team activity widget: the latest entries of the activity feed.

use super::{
    setting_u64, truncate, RenderError, SettingField, SettingKind, Widget, WidgetContext,
    WidgetDefinition, WidgetProps, WidgetSize, WidgetType,
};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// Registry definition.
pub static DEFINITION: WidgetDefinition = WidgetDefinition {
    widget_type: WidgetType::TeamActivity,
    title_key: "widgets.team_activity.title",
    default_size: WidgetSize::Medium,
    available_sizes: &[WidgetSize::Medium, WidgetSize::Large],
    settings_schema: &[SettingField {
        key: "limit",
        label_key: "settings.limit",
        kind: SettingKind::Number {
            min: 1,
            max: 10,
            step: 1,
            default: 5,
        },
    }],
    factory: create,
};

/// Team activity component.
#[derive(Debug, Default)]
pub struct TeamActivityWidget;

fn create() -> Box<dyn Widget> {
    Box::new(TeamActivityWidget)
}

/// `12m`, `3h`, `1d`
fn format_age(minutes: u32) -> String {
    match minutes {
        0..=59 => format!("{}m", minutes),
        60..=1439 => format!("{}h", minutes / 60),
        _ => format!("{}d", minutes / 1440),
    }
}

impl Widget for TeamActivityWidget {
    fn render(
        &self,
        props: &WidgetProps<'_>,
        context: &WidgetContext<'_>,
    ) -> Result<Vec<Line<'static>>, RenderError> {
        let limit = setting_u64(props.settings, "limit", 5)? as usize;
        if context.data.activity.is_empty() {
            return Ok(vec![Line::raw(context.t("activity.empty").to_string())]);
        }
        let width = props.width as usize;

        Ok(context
            .data
            .activity
            .iter()
            .take(limit)
            .map(|a| {
                let age = format!("{:>4} ", format_age(a.minutes_ago));
                let rest = truncate(
                    &format!("{} {}", a.who, a.action),
                    width.saturating_sub(age.len()),
                );
                Line::from(vec![
                    Span::styled(age, Style::default().add_modifier(Modifier::DIM)),
                    Span::raw(rest),
                ])
            })
            .collect())
    }

    fn widget_type(&self) -> WidgetType {
        WidgetType::TeamActivity
    }
}
