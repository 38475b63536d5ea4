//! Layout state owner: validated mutations and persistence.

use buildtrack_storage::Storage;
use chrono::Utc;
use serde_json::Value;

use super::grid::{GridBounds, Position};
use super::model::{Layout, LayoutError, WidgetFlags, WidgetInstance};
use crate::widgets::{Settings, WidgetDefinition, WidgetRegistry, WidgetSize, WidgetType};

/// Storage key prefix of per-user layouts.
pub const LAYOUT_KEY_PREFIX: &str = "buildtrack_dashboard_layout_";

/// Widgets of a fresh dashboard, with their origins.
const DEFAULT_PLACEMENTS: &[(WidgetType, u16, u16)] = &[
    (WidgetType::ProjectOverview, 0, 0),
    (WidgetType::TaskList, 6, 0),
    (WidgetType::BudgetSummary, 0, 2),
    (WidgetType::UpcomingDeadlines, 3, 2),
];

/// Storage key of `user_id`'s layout.
pub fn layout_key(user_id: &str) -> String {
    format!("{LAYOUT_KEY_PREFIX}{user_id}")
}

/// Builds the default layout for `user_id`.
///
/// Placements whose type isn't registered or that don't fit `bounds` are
/// left out.
pub fn default_layout(user_id: &str, registry: &WidgetRegistry, bounds: GridBounds) -> Layout {
    let mut layout = Layout::empty(user_id);
    for &(widget_type, x, y) in DEFAULT_PLACEMENTS {
        let Some(definition) = registry.get(widget_type) else {
            continue;
        };
        let position = Position::with_size(x, y, definition.default_size);
        if !bounds.contains(&position) {
            continue;
        }
        let id = layout.next_id(widget_type);
        layout.widgets.push(WidgetInstance {
            id,
            widget_type,
            position,
            size: definition.default_size,
            settings: definition.default_settings(),
            flags: WidgetFlags::default(),
        });
    }
    layout
}

/// Checks a widget instance against the registry and grid invariants.
pub fn validate_instance(
    instance: &WidgetInstance,
    registry: &WidgetRegistry,
    bounds: GridBounds,
) -> Result<(), LayoutError> {
    let definition = registry
        .get(instance.widget_type)
        .ok_or_else(|| LayoutError::UnknownWidgetType(instance.widget_type.to_string()))?;
    if !definition.allows(instance.size) {
        return Err(LayoutError::SizeNotAllowed {
            widget_type: instance.widget_type,
            size: instance.size,
        });
    }
    let (w, h) = instance.size.dimensions();
    if (instance.position.w, instance.position.h) != (w, h) {
        return Err(LayoutError::InvalidDimensions {
            w: instance.position.w,
            h: instance.position.h,
        });
    }
    if !bounds.contains(&instance.position) {
        return Err(LayoutError::OutOfBounds {
            position: instance.position,
            bounds,
        });
    }
    Ok(())
}

/// Decodes a stored layout document entry by entry.
///
/// Entries that fail to decode or validate are dropped with a warning. A
/// document that is not a JSON object is an error.
fn decode_layout(
    raw: &str,
    user_id: &str,
    registry: &WidgetRegistry,
    bounds: GridBounds,
) -> Result<Layout, serde_json::Error> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(mut doc) = value else {
        return Err(serde::de::Error::custom("layout document is not an object"));
    };

    let mut layout = Layout::empty(user_id);
    if let Some(updated_at) = doc
        .get("updated_at")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
    {
        layout.updated_at = updated_at;
    }
    let stored_seq = doc.get("next_seq").and_then(Value::as_u64).unwrap_or(1);

    let entries = match doc.remove("widgets") {
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(serde::de::Error::custom("`widgets` is not an array")),
        None => Vec::new(),
    };

    let mut max_seq = 0;
    for (index, entry) in entries.into_iter().enumerate() {
        let instance: WidgetInstance = match serde_json::from_value(entry) {
            Ok(instance) => instance,
            Err(e) => {
                tracing::warn!(user_id, index, error = %e, "dropping undecodable widget entry");
                continue;
            }
        };
        if let Err(e) = validate_instance(&instance, registry, bounds) {
            tracing::warn!(
                user_id,
                widget_id = %instance.id,
                error = %e,
                "dropping invalid widget entry"
            );
            continue;
        }
        if layout.get(&instance.id).is_some() {
            tracing::warn!(user_id, widget_id = %instance.id, "dropping duplicate widget id");
            continue;
        }
        if let Some(seq) = instance
            .id
            .rsplit_once('-')
            .and_then(|(_, n)| n.parse::<u64>().ok())
        {
            max_seq = max_seq.max(seq);
        }
        layout.widgets.push(instance);
    }
    layout.next_seq = stored_seq.max(max_seq + 1);
    Ok(layout)
}

/// Owner of one user's layout.
///
/// Every mutation is validated before it is applied; a rejected mutation
/// leaves the layout untouched. Accepted mutations are written to storage
/// immediately. Storage failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct LayoutManager<S: Storage> {
    storage: S,
    registry: WidgetRegistry,
    bounds: GridBounds,
    layout: Layout,
    edit_mode: bool,
}

impl<S: Storage> LayoutManager<S> {
    /// Loads `user_id`'s layout from `storage`.
    ///
    /// A missing layout yields the default one. An unreadable or corrupt
    /// document is logged and replaced by the default layout.
    pub fn load(storage: S, registry: WidgetRegistry, bounds: GridBounds, user_id: &str) -> Self {
        let key = layout_key(user_id);
        let layout = match storage.get_item(&key) {
            Ok(Some(raw)) => match decode_layout(&raw, user_id, &registry, bounds) {
                Ok(layout) => {
                    tracing::debug!(user_id, widgets = layout.len(), "layout loaded");
                    layout
                }
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "corrupt layout, using default");
                    default_layout(user_id, &registry, bounds)
                }
            },
            Ok(None) => {
                tracing::debug!(user_id, "no stored layout, using default");
                default_layout(user_id, &registry, bounds)
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "failed to read layout, using default");
                default_layout(user_id, &registry, bounds)
            }
        };

        Self {
            storage,
            registry,
            bounds,
            layout,
            edit_mode: false,
        }
    }

    /// Current layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Placed widgets in insertion order.
    pub fn widgets(&self) -> &[WidgetInstance] {
        &self.layout.widgets
    }

    /// Looks up a widget by id.
    pub fn widget(&self, id: &str) -> Option<&WidgetInstance> {
        self.layout.get(id)
    }

    /// Widget registry the layout is validated against.
    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Grid extent.
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Underlying storage, mutably.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Whether the dashboard is in edit mode.
    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Enters or leaves edit mode. Not persisted.
    pub fn set_edit_mode(&mut self, on: bool) {
        if self.edit_mode != on {
            tracing::debug!(edit_mode = on, "edit mode changed");
        }
        self.edit_mode = on;
    }

    /// Flips edit mode, returning the new state.
    pub fn toggle_edit_mode(&mut self) -> bool {
        self.set_edit_mode(!self.edit_mode);
        self.edit_mode
    }

    /// Definition of the widget `id`.
    pub fn definition_for(&self, id: &str) -> Result<&'static WidgetDefinition, LayoutError> {
        let instance = self.existing(id)?;
        self.definition(instance.widget_type)
    }

    /// Adds a widget of `widget_type` below all existing widgets.
    ///
    /// Returns the new widget's id.
    pub fn add_widget(&mut self, widget_type: WidgetType) -> Result<String, LayoutError> {
        let definition = self.definition(widget_type)?;
        let position = Position::with_size(0, self.layout.bottom(), definition.default_size);
        if !self.bounds.contains(&position) {
            tracing::debug!(%widget_type, "add rejected: layout full");
            return Err(LayoutError::LayoutFull {
                max_rows: self.bounds.max_rows,
            });
        }

        let id = self.layout.next_id(widget_type);
        self.layout.widgets.push(WidgetInstance {
            id: id.clone(),
            widget_type,
            position,
            size: definition.default_size,
            settings: definition.default_settings(),
            flags: WidgetFlags::default(),
        });
        tracing::info!(widget_id = %id, %position, "widget added");
        self.commit();
        Ok(id)
    }

    /// Removes the widget `id`, returning it.
    pub fn remove_widget(&mut self, id: &str) -> Result<WidgetInstance, LayoutError> {
        let index = self
            .layout
            .widgets
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| self.not_found(id))?;
        let removed = self.layout.widgets.remove(index);
        tracing::info!(widget_id = id, "widget removed");
        self.commit();
        Ok(removed)
    }

    /// Moves (and possibly resizes) the widget `id` to `position`.
    ///
    /// `position.w`/`position.h` must be the dimensions of an available size
    /// of the widget's type. The widget's size follows the new dimensions.
    pub fn update_widget_position(
        &mut self,
        id: &str,
        position: Position,
    ) -> Result<(), LayoutError> {
        let instance = self.existing(id)?;
        if instance.flags.locked {
            return self.reject(LayoutError::Locked(id.to_string()));
        }
        let definition = self.definition(instance.widget_type)?;
        let Some(size) = WidgetSize::from_dimensions(position.w, position.h) else {
            return self.reject(LayoutError::InvalidDimensions {
                w: position.w,
                h: position.h,
            });
        };
        if !definition.allows(size) {
            return self.reject(LayoutError::SizeNotAllowed {
                widget_type: instance.widget_type,
                size,
            });
        }
        if !self.bounds.contains(&position) {
            return self.reject(LayoutError::OutOfBounds {
                position,
                bounds: self.bounds,
            });
        }

        if let Some(instance) = self.layout.get_mut(id) {
            if instance.position == position {
                return Ok(());
            }
            instance.position = position;
            instance.size = size;
        }
        tracing::debug!(widget_id = id, %position, "widget moved");
        self.commit();
        Ok(())
    }

    /// Changes the size class of the widget `id`, keeping its origin.
    pub fn resize_widget(&mut self, id: &str, size: WidgetSize) -> Result<(), LayoutError> {
        let instance = self.existing(id)?;
        if instance.flags.locked {
            return self.reject(LayoutError::Locked(id.to_string()));
        }
        let definition = self.definition(instance.widget_type)?;
        if !definition.allows(size) {
            return self.reject(LayoutError::SizeNotAllowed {
                widget_type: instance.widget_type,
                size,
            });
        }
        let position = Position::with_size(instance.position.x, instance.position.y, size);
        if !self.bounds.contains(&position) {
            return self.reject(LayoutError::OutOfBounds {
                position,
                bounds: self.bounds,
            });
        }

        if let Some(instance) = self.layout.get_mut(id) {
            if instance.size == size {
                return Ok(());
            }
            instance.size = size;
            instance.position = position;
        }
        tracing::debug!(widget_id = id, %size, "widget resized");
        self.commit();
        Ok(())
    }

    /// Merges `partial` into the settings of widget `id`.
    ///
    /// Keys present in `partial` overwrite; every other key is kept.
    pub fn update_widget_settings(&mut self, id: &str, partial: Settings) -> Result<(), LayoutError> {
        let Some(instance) = self.layout.get_mut(id) else {
            return Err(self.not_found(id));
        };
        let changed: Vec<String> = partial.keys().cloned().collect();
        for (key, value) in partial {
            instance.settings.insert(key, value);
        }
        tracing::debug!(widget_id = id, ?changed, "widget settings updated");
        self.commit();
        Ok(())
    }

    /// Sets the edit-mode flags of widget `id`.
    pub fn set_widget_flags(&mut self, id: &str, flags: WidgetFlags) -> Result<(), LayoutError> {
        let Some(instance) = self.layout.get_mut(id) else {
            return Err(self.not_found(id));
        };
        if instance.flags == flags {
            return Ok(());
        }
        instance.flags = flags;
        tracing::debug!(
            widget_id = id,
            visible = flags.visible,
            locked = flags.locked,
            "widget flags updated"
        );
        self.commit();
        Ok(())
    }

    /// Replaces the layout with the default layout.
    pub fn reset_to_default(&mut self) {
        let user_id = self.layout.user_id.clone();
        self.layout = default_layout(&user_id, &self.registry, self.bounds);
        tracing::info!(user_id = %user_id, "layout reset to default");
        self.commit();
    }

    /// Writes the layout to storage. Failures are logged, not returned.
    pub fn persist(&mut self) {
        let key = layout_key(&self.layout.user_id);
        let json = match serde_json::to_string(&self.layout) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize layout");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(&key, &json) {
            tracing::warn!(key = %key, error = %e, "failed to persist layout");
        }
    }

    fn commit(&mut self) {
        self.layout.updated_at = Utc::now();
        self.persist();
    }

    fn existing(&self, id: &str) -> Result<&WidgetInstance, LayoutError> {
        self.layout.get(id).ok_or_else(|| self.not_found(id))
    }

    fn definition(&self, widget_type: WidgetType) -> Result<&'static WidgetDefinition, LayoutError> {
        self.registry
            .get(widget_type)
            .ok_or_else(|| LayoutError::UnknownWidgetType(widget_type.to_string()))
    }

    fn not_found(&self, id: &str) -> LayoutError {
        tracing::debug!(widget_id = id, "widget not found");
        LayoutError::WidgetNotFound(id.to_string())
    }

    fn reject(&self, error: LayoutError) -> Result<(), LayoutError> {
        tracing::debug!(error = %error, "layout mutation rejected");
        Err(error)
    }
}
