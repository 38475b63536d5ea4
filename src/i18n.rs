//! Translation lookup.
//!
//! Message loading is out of scope for the dashboard; the catalogs below
//! cover the keys the dashboard itself uses. [`Translator::t`] falls back to
//! English and then to the key, so an unknown key never renders as nothing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported UI languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    /// English (default)
    #[default]
    En,
    /// Spanish
    Es,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Es => write!(f, "es"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            _ => Err(format!("unsupported locale: {s}")),
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("dashboard.title", "BuildTrack Dashboard"),
    ("dashboard.mode.view", "VIEW"),
    ("dashboard.mode.edit", "EDIT"),
    ("dashboard.empty", "No widgets yet. Press [e] then [a] to add one."),
    (
        "dashboard.footer.view",
        "[e] Edit  [Tab] Select  [r] Retry  [q] Quit",
    ),
    (
        "dashboard.footer.edit",
        "[e] Done  [a] Add  [d] Remove  [s] Settings  [arrows] Move  [+/-] Resize  [h] Hide  [l] Lock",
    ),
    ("dashboard.add_widget", "Add widget"),
    ("dashboard.settings", "Widget settings"),
    ("dashboard.settings.footer", "[j/k] Field  [h/l] Change  [Enter] Save  [Esc] Cancel"),
    ("widget.error", "This widget failed to render"),
    ("widget.retry_hint", "Select it and press [r] to retry"),
    ("widget.hidden", "hidden"),
    ("widget.locked", "locked"),
    ("widgets.project_overview.title", "Project Overview"),
    ("widgets.task_list.title", "Tasks"),
    ("widgets.budget_summary.title", "Budget"),
    ("widgets.team_activity.title", "Team Activity"),
    ("widgets.upcoming_deadlines.title", "Upcoming Deadlines"),
    ("widgets.site_weather.title", "Site Weather"),
    ("settings.project_id", "Project"),
    ("settings.limit", "Items shown"),
    ("settings.show_completed", "Show completed"),
    ("settings.currency", "Currency"),
    ("settings.days_ahead", "Days ahead"),
    ("settings.location", "Site"),
    ("settings.units", "Units"),
    ("project.phase", "Phase"),
    ("project.manager", "Manager"),
    ("project.due", "Due"),
    ("tasks.empty", "Nothing to do"),
    ("deadlines.empty", "No deadlines in range"),
    ("deadlines.today", "today"),
    ("deadlines.overdue", "overdue"),
    ("budget.total", "Total"),
    ("weather.wind", "Wind"),
    ("weather.precipitation", "Rain"),
    ("activity.empty", "No recent activity"),
];

const ES: &[(&str, &str)] = &[
    ("dashboard.title", "Panel de BuildTrack"),
    ("dashboard.mode.view", "VER"),
    ("dashboard.mode.edit", "EDITAR"),
    ("dashboard.empty", "Sin widgets. Pulsa [e] y luego [a] para añadir uno."),
    (
        "dashboard.footer.view",
        "[e] Editar  [Tab] Seleccionar  [r] Reintentar  [q] Salir",
    ),
    (
        "dashboard.footer.edit",
        "[e] Listo  [a] Añadir  [d] Quitar  [s] Ajustes  [flechas] Mover  [+/-] Tamaño  [h] Ocultar  [l] Bloquear",
    ),
    ("dashboard.add_widget", "Añadir widget"),
    ("dashboard.settings", "Ajustes del widget"),
    ("dashboard.settings.footer", "[j/k] Campo  [h/l] Cambiar  [Enter] Guardar  [Esc] Cancelar"),
    ("widget.error", "Este widget no se pudo mostrar"),
    ("widget.retry_hint", "Selecciónalo y pulsa [r] para reintentar"),
    ("widget.hidden", "oculto"),
    ("widget.locked", "bloqueado"),
    ("widgets.project_overview.title", "Resumen del proyecto"),
    ("widgets.task_list.title", "Tareas"),
    ("widgets.budget_summary.title", "Presupuesto"),
    ("widgets.team_activity.title", "Actividad del equipo"),
    ("widgets.upcoming_deadlines.title", "Próximos vencimientos"),
    ("widgets.site_weather.title", "Clima en obra"),
    ("settings.project_id", "Proyecto"),
    ("settings.limit", "Elementos"),
    ("settings.show_completed", "Mostrar completadas"),
    ("settings.currency", "Moneda"),
    ("settings.days_ahead", "Días de antelación"),
    ("settings.location", "Obra"),
    ("settings.units", "Unidades"),
    ("project.phase", "Fase"),
    ("project.manager", "Responsable"),
    ("project.due", "Entrega"),
    ("tasks.empty", "Nada pendiente"),
    ("deadlines.empty", "Sin vencimientos en el rango"),
    ("deadlines.today", "hoy"),
    ("deadlines.overdue", "vencida"),
    ("budget.total", "Total"),
    ("weather.wind", "Viento"),
    ("weather.precipitation", "Lluvia"),
    ("activity.empty", "Sin actividad reciente"),
];

/// Looks up UI strings for one locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    /// Creates a translator for `locale`.
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Active locale.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Translates `key`, falling back to English and then to the key itself.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        let catalog = match self.locale {
            Locale::En => EN,
            Locale::Es => ES,
        };
        lookup(catalog, key)
            .or_else(|| lookup(EN, key))
            .unwrap_or(key)
    }
}

fn lookup(catalog: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    catalog.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_lookup() {
        let t = Translator::new(Locale::En);
        assert_eq!(t.t("widgets.task_list.title"), "Tasks");
    }

    #[test]
    fn test_spanish_lookup() {
        let t = Translator::new(Locale::Es);
        assert_eq!(t.t("widgets.task_list.title"), "Tareas");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        let t = Translator::new(Locale::Es);
        assert_eq!(t.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_catalogs_cover_the_same_keys() {
        for (key, _) in EN {
            assert!(lookup(ES, key).is_some(), "missing es translation for {key}");
        }
        assert_eq!(EN.len(), ES.len());
    }

    #[test]
    fn test_locale_parse_and_display() {
        assert_eq!("ES".parse::<Locale>(), Ok(Locale::Es));
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::En.to_string(), "en");
    }
}
