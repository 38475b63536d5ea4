//! Per-widget settings editor.
//!
//! A [`SettingsPanel`] holds a draft of one widget's settings, one field per
//! entry of the widget's settings schema. Editing only touches the draft;
//! [`SettingsPanel::apply`] hands the changed keys to
//! [`LayoutManager::update_widget_settings`], which merges them into the
//! stored settings.

use buildtrack_storage::Storage;
use serde_json::Value;
use thiserror::Error;

use crate::layout::{LayoutError, LayoutManager};
use crate::widgets::{SettingField, SettingKind, Settings, WidgetType};

/// Maximum length of a text setting.
const MAX_TEXT_LEN: usize = 32;

/// Errors opening or applying a settings panel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    /// Settings can only be edited in edit mode.
    #[error("settings can only be edited in edit mode")]
    EditModeOff,

    /// The layout rejected the widget or the update.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// One editable field of the draft.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftField {
    /// Schema entry
    pub field: &'static SettingField,
    /// Current draft value
    pub value: Value,
    original: Value,
}

impl DraftField {
    /// Whether the draft value differs from the widget's stored value.
    pub fn is_changed(&self) -> bool {
        self.value != self.original
    }

    /// Draft value formatted for display.
    pub fn display_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Bool(true) => "on".to_string(),
            Value::Bool(false) => "off".to_string(),
            other => other.to_string(),
        }
    }
}

/// Draft editor for one widget's settings.
#[derive(Debug, Clone)]
pub struct SettingsPanel {
    widget_id: String,
    widget_type: WidgetType,
    fields: Vec<DraftField>,
    selected: usize,
}

impl SettingsPanel {
    /// Opens the panel for widget `id`.
    ///
    /// Each schema field starts from the widget's stored value, or from the
    /// schema default when the widget has none.
    pub fn open<S: Storage>(manager: &LayoutManager<S>, id: &str) -> Result<Self, PanelError> {
        if !manager.is_edit_mode() {
            return Err(PanelError::EditModeOff);
        }
        let instance = manager
            .widget(id)
            .ok_or_else(|| LayoutError::WidgetNotFound(id.to_string()))?;
        let definition = manager.definition_for(id)?;

        let fields = definition
            .settings_schema
            .iter()
            .map(|field| {
                let value = instance
                    .settings
                    .get(field.key)
                    .filter(|v| !v.is_null())
                    .cloned()
                    .unwrap_or_else(|| field.default_value());
                DraftField {
                    field,
                    original: value.clone(),
                    value,
                }
            })
            .collect();

        tracing::debug!(widget_id = id, "settings panel opened");
        Ok(Self {
            widget_id: id.to_string(),
            widget_type: instance.widget_type,
            fields,
            selected: 0,
        })
    }

    /// Id of the widget being edited.
    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    /// Type of the widget being edited.
    pub fn widget_type(&self) -> WidgetType {
        self.widget_type
    }

    /// Draft fields in schema order.
    pub fn fields(&self) -> &[DraftField] {
        &self.fields
    }

    /// Index of the selected field.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The selected field, if the schema has any.
    pub fn selected_field(&self) -> Option<&DraftField> {
        self.fields.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.fields.is_empty() {
            self.selected = (self.selected + 1) % self.fields.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.fields.is_empty() {
            self.selected = (self.selected + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Raises a number by its step, flips a toggle or moves a choice forward.
    pub fn increment(&mut self) {
        self.adjust(true);
    }

    /// Lowers a number by its step, flips a toggle or moves a choice back.
    pub fn decrement(&mut self) {
        self.adjust(false);
    }

    fn adjust(&mut self, forward: bool) {
        let Some(draft) = self.fields.get_mut(self.selected) else {
            return;
        };
        draft.value = match draft.field.kind {
            SettingKind::Number {
                min,
                max,
                step,
                default,
            } => {
                let current = draft.value.as_i64().unwrap_or(default);
                let next = if forward {
                    current.saturating_add(step)
                } else {
                    current.saturating_sub(step)
                };
                Value::from(next.clamp(min, max))
            }
            SettingKind::Toggle { default } => {
                Value::Bool(!draft.value.as_bool().unwrap_or(default))
            }
            SettingKind::Choice { options, default } => {
                if options.is_empty() {
                    return;
                }
                let current = draft.value.as_str().unwrap_or(default);
                let next = match options.iter().position(|o| *o == current) {
                    Some(i) if forward => (i + 1) % options.len(),
                    Some(i) => (i + options.len() - 1) % options.len(),
                    None => 0,
                };
                Value::from(options[next])
            }
            SettingKind::Text { .. } => return,
        };
    }

    /// Replaces the selected text field's value. Returns `false` if the
    /// selected field is not a text field.
    pub fn set_text(&mut self, text: &str) -> bool {
        match self.fields.get_mut(self.selected) {
            Some(draft) if matches!(draft.field.kind, SettingKind::Text { .. }) => {
                let text: String = text.chars().take(MAX_TEXT_LEN).collect();
                draft.value = Value::String(text);
                true
            }
            _ => false,
        }
    }

    /// Appends a character to the selected text field.
    pub fn push_char(&mut self, c: char) -> bool {
        let mut text = self.selected_text();
        text.push(c);
        self.set_text(&text)
    }

    /// Removes the last character of the selected text field.
    pub fn pop_char(&mut self) -> bool {
        let mut text = self.selected_text();
        text.pop();
        self.set_text(&text)
    }

    fn selected_text(&self) -> String {
        self.selected_field()
            .and_then(|d| d.value.as_str())
            .unwrap_or_default()
            .to_string()
    }

    /// Settings that differ from the widget's stored values.
    pub fn changes(&self) -> Settings {
        self.fields
            .iter()
            .filter(|d| d.is_changed())
            .map(|d| (d.field.key.to_string(), d.value.clone()))
            .collect()
    }

    /// Whether any field was changed.
    pub fn is_dirty(&self) -> bool {
        self.fields.iter().any(DraftField::is_changed)
    }

    /// Writes the changed settings back through the layout manager.
    ///
    /// Returns the keys that were applied; an unchanged draft writes nothing.
    pub fn apply<S: Storage>(self, manager: &mut LayoutManager<S>) -> Result<Settings, PanelError> {
        if !manager.is_edit_mode() {
            return Err(PanelError::EditModeOff);
        }
        let changes = self.changes();
        if changes.is_empty() {
            tracing::debug!(widget_id = %self.widget_id, "settings panel closed without changes");
            return Ok(changes);
        }
        manager.update_widget_settings(&self.widget_id, changes.clone())?;
        Ok(changes)
    }

    /// Discards the draft.
    pub fn cancel(self) {
        tracing::debug!(
            widget_id = %self.widget_id,
            discarded = self.is_dirty(),
            "settings panel canceled"
        );
    }
}
