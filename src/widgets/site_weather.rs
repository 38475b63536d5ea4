//! Site weather widget.

use super::{
    setting_str, truncate, RenderError, SettingField, SettingKind, Widget, WidgetContext,
    WidgetDefinition, WidgetProps, WidgetSize, WidgetType,
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Registry definition.
pub static DEFINITION: WidgetDefinition = WidgetDefinition {
    widget_type: WidgetType::SiteWeather,
    title_key: "widgets.site_weather.title",
    default_size: WidgetSize::Small,
    available_sizes: &[WidgetSize::Small, WidgetSize::Medium],
    settings_schema: &[
        SettingField {
            key: "location",
            label_key: "settings.location",
            kind: SettingKind::Choice {
                options: &["Site A", "Site B", "Site C"],
                default: "Site A",
            },
        },
        SettingField {
            key: "units",
            label_key: "settings.units",
            kind: SettingKind::Choice {
                options: &["metric", "imperial"],
                default: "metric",
            },
        },
    ],
    factory: create,
};

/// Site weather component.
#[derive(Debug, Default)]
pub struct SiteWeatherWidget;

fn create() -> Box<dyn Widget> {
    Box::new(SiteWeatherWidget)
}

impl Widget for SiteWeatherWidget {
    fn render(
        &self,
        props: &WidgetProps<'_>,
        context: &WidgetContext<'_>,
    ) -> Result<Vec<Line<'static>>, RenderError> {
        let site = setting_str(props.settings, "location", "Site A")?;
        let units = setting_str(props.settings, "units", "metric")?;
        let report = context
            .data
            .weather_for(site)
            .ok_or_else(|| RenderError::NotFound {
                kind: "site",
                id: site.to_string(),
            })?;
        let width = props.width as usize;

        let (temp, wind) = match units {
            "metric" => (
                format!("{}°C", report.temp_c),
                format!("{} km/h", report.wind_kph),
            ),
            "imperial" => (
                format!("{}°F", (report.temp_c as i32 * 9 / 5) + 32),
                format!("{} mph", (report.wind_kph as u32 * 621 + 500) / 1000),
            ),
            other => {
                return Err(RenderError::InvalidSetting {
                    key: "units".to_string(),
                    reason: format!("expected metric or imperial, got {other}"),
                })
            }
        };

        let rain_style = if report.precipitation >= 60 {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        Ok(vec![
            Line::from(Span::styled(
                truncate(&format!("{} · {}", report.site, temp), width),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::raw(truncate(&report.condition, width)),
            Line::raw(truncate(
                &format!("{}: {}", context.t("weather.wind"), wind),
                width,
            )),
            Line::from(Span::styled(
                truncate(
                    &format!(
                        "{}: {}%",
                        context.t("weather.precipitation"),
                        report.precipitation
                    ),
                    width,
                ),
                rain_style,
            )),
        ])
    }

    fn widget_type(&self) -> WidgetType {
        WidgetType::SiteWeather
    }
}
