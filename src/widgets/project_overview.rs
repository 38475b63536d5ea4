//! Project overview widget.
//!
//! Shows one project's name, phase, completion bar, manager and due date.
//! The project is chosen through the `project_id` setting; an unknown id is
//! a render error.

use super::{
    progress_bar, setting_str, truncate, RenderError, SettingField, SettingKind, Widget,
    WidgetContext, WidgetDefinition, WidgetProps, WidgetSize, WidgetType,
};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

const DEFAULT_PROJECT: &str = "P-100";

/// Registry definition.
pub static DEFINITION: WidgetDefinition = WidgetDefinition {
    widget_type: WidgetType::ProjectOverview,
    title_key: "widgets.project_overview.title",
    default_size: WidgetSize::Medium,
    available_sizes: &[WidgetSize::Medium, WidgetSize::Large, WidgetSize::ExtraLarge],
    settings_schema: &[SettingField {
        key: "project_id",
        label_key: "settings.project_id",
        kind: SettingKind::Text {
            default: DEFAULT_PROJECT,
        },
    }],
    factory: create,
};

/// Project overview component.
#[derive(Debug, Default)]
pub struct ProjectOverviewWidget;

fn create() -> Box<dyn Widget> {
    Box::new(ProjectOverviewWidget)
}

impl Widget for ProjectOverviewWidget {
    fn render(
        &self,
        props: &WidgetProps<'_>,
        context: &WidgetContext<'_>,
    ) -> Result<Vec<Line<'static>>, RenderError> {
        let project_id = setting_str(props.settings, "project_id", DEFAULT_PROJECT)?;
        let project = context
            .data
            .project(project_id)
            .ok_or_else(|| RenderError::NotFound {
                kind: "project",
                id: project_id.to_string(),
            })?;
        let width = props.width as usize;

        let mut lines = vec![
            Line::from(Span::styled(
                truncate(&format!("{} · {}", project.id, project.name), width),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::raw(truncate(
                &format!(
                    "{}: {}  {}%",
                    context.t("project.phase"),
                    project.phase,
                    project.progress
                ),
                width,
            )),
            Line::raw(progress_bar(project.progress as u64, width.min(32))),
        ];

        let days = context.data.days_until(project.due);
        lines.push(Line::raw(truncate(
            &format!("{}: {}", context.t("project.manager"), project.manager),
            width,
        )));
        lines.push(Line::raw(truncate(
            &format!(
                "{}: {} ({}d)",
                context.t("project.due"),
                project.due.format("%Y-%m-%d"),
                days
            ),
            width,
        )));
        lines.push(Line::raw(truncate(&project.site, width)));

        Ok(lines)
    }

    fn widget_type(&self) -> WidgetType {
        WidgetType::ProjectOverview
    }
}
