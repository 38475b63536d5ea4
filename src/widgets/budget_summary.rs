//! Budget summary widget: spend against budget per project, plus a total.

use super::{
    setting_str, truncate, RenderError, SettingField, SettingKind, Widget, WidgetContext,
    WidgetDefinition, WidgetProps, WidgetSize, WidgetType,
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const CURRENCIES: &[&str] = &["USD", "EUR", "GBP"];

/// Registry definition.
pub static DEFINITION: WidgetDefinition = WidgetDefinition {
    widget_type: WidgetType::BudgetSummary,
    title_key: "widgets.budget_summary.title",
    default_size: WidgetSize::Small,
    available_sizes: &[WidgetSize::Small, WidgetSize::Medium],
    settings_schema: &[SettingField {
        key: "currency",
        label_key: "settings.currency",
        kind: SettingKind::Choice {
            options: CURRENCIES,
            default: "USD",
        },
    }],
    factory: create,
};

/// Budget summary component.
#[derive(Debug, Default)]
pub struct BudgetSummaryWidget;

fn create() -> Box<dyn Widget> {
    Box::new(BudgetSummaryWidget)
}

fn currency_symbol(code: &str) -> Result<&'static str, RenderError> {
    match code {
        "USD" => Ok("$"),
        "EUR" => Ok("€"),
        "GBP" => Ok("£"),
        other => Err(RenderError::InvalidSetting {
            key: "currency".to_string(),
            reason: format!("unsupported currency {other}"),
        }),
    }
}

/// Compact money format: `$12.5M`, `$910K`, `$640`.
fn format_money(symbol: &str, amount: u64) -> String {
    if amount >= 1_000_000 {
        format!("{}{:.1}M", symbol, amount as f64 / 1_000_000.0)
    } else if amount >= 1_000 {
        format!("{}{}K", symbol, amount / 1_000)
    } else {
        format!("{}{}", symbol, amount)
    }
}

impl Widget for BudgetSummaryWidget {
    fn render(
        &self,
        props: &WidgetProps<'_>,
        context: &WidgetContext<'_>,
    ) -> Result<Vec<Line<'static>>, RenderError> {
        let symbol = currency_symbol(setting_str(props.settings, "currency", "USD")?)?;
        let width = props.width as usize;

        let mut lines: Vec<Line<'static>> = context
            .data
            .projects
            .iter()
            .map(|p| {
                let pct = p.spent_percent();
                let style = if pct > 100 {
                    Style::default().fg(Color::Red)
                } else if pct > 90 {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                let text = format!(
                    "{} {}/{} {}%",
                    p.id,
                    format_money(symbol, p.spent),
                    format_money(symbol, p.budget),
                    pct
                );
                Line::from(Span::styled(truncate(&text, width), style))
            })
            .collect();

        let spent: u64 = context.data.projects.iter().map(|p| p.spent).sum();
        let budget: u64 = context.data.projects.iter().map(|p| p.budget).sum();
        let total = format!(
            "{}: {}/{}",
            context.t("budget.total"),
            format_money(symbol, spent),
            format_money(symbol, budget)
        );
        lines.push(Line::from(Span::styled(
            truncate(&total, width),
            Style::default().add_modifier(Modifier::BOLD),
        )));

        Ok(lines)
    }

    fn widget_type(&self) -> WidgetType {
        WidgetType::BudgetSummary
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

    fn render_with(settings: Settings) -> Result<Vec<String>, RenderError> {
        let data = DemoData::sample(NaiveDate::from_ymd_opt(2026, 10, 16).expect("date"));
        let translator = Translator::default();
        let ctx = WidgetContext::new(&data, &translator);
        let props = WidgetProps {
            id: "budget_summary-1",
            title: "Budget",
            settings: &settings,
            is_edit_mode: false,
            width: 60,
            height: 4,
        };
        BudgetSummaryWidget
            .render(&props, &ctx)
            .map(|lines| lines.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("$", 12_500_000), "$12.5M");
        assert_eq!(format_money("$", 910_000), "$910K");
        assert_eq!(format_money("£", 640), "£640");
    }

    #[test]
    fn test_one_row_per_project_plus_total() {
        let lines = render_with(Settings::new()).expect("render");
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("P-100 $5.9M/$12.5M 47%"));
        assert!(lines[3].starts_with("Total:"));
    }

    #[test]
    fn test_currency_setting_changes_symbol() {
        let lines = render_with(json!({"currency": "EUR"}).as_object().cloned().expect("object"))
            .expect("render");
        assert!(lines[0].contains('€'));
    }

    #[test]
    fn test_unsupported_currency_is_render_error() {
        let err = render_with(json!({"currency": "XYZ"}).as_object().cloned().expect("object"))
            .expect_err("unsupported");
        assert!(matches!(err, RenderError::InvalidSetting { ref key, .. } if key == "currency"));
    }
}
