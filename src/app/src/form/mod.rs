//! Form engine
//!
//! Builds a `FormView` from the settings schema, fills it from a config
//! payload and reads it back into a sparse payload for saving.

pub mod field;

use log::debug;

use crate::error::FormError;
use crate::types::{
    variable_id, FieldView, FormView, Payload, RowView, Schema, SectionView, Widget,
};

pub use field::{behavior, FieldBehavior, DEVICE_ID_PREFIX};

/// Render the schema into a fresh, empty form
///
/// Variables of an unsupported type render nothing. Rows left without any
/// field are dropped.
pub fn render(schema: &Schema) -> FormView {
    let sections = schema
        .settings
        .iter()
        .map(|setting| SectionView {
            name: setting.name.clone(),
            title: setting.title.clone(),
            rows: setting
                .variables
                .iter()
                .map(|entry| RowView {
                    fields: entry
                        .variables()
                        .iter()
                        .filter_map(|variable| {
                            let behavior = behavior(&variable.field_type)?;
                            let id = variable_id(&setting.name, &variable.name);
                            Some(FieldView {
                                label: variable.title.clone(),
                                columns: behavior.columns(),
                                widget: behavior.widget(&id, variable),
                                id,
                            })
                        })
                        .collect(),
                })
                .filter(|row| !row.fields.is_empty())
                .collect(),
        })
        .collect();

    FormView { sections }
}

/// Fill the form from a payload
///
/// Settings and variables missing from the payload leave their widgets
/// untouched.
pub fn load(schema: &Schema, view: &mut FormView, payload: &Payload) -> Result<(), FormError> {
    for setting in &schema.settings {
        let Some(values) = payload.setting(&setting.name) else {
            debug!("no config for setting '{}'", setting.name);
            continue;
        };

        for variable in setting.all_variables() {
            let Some(behavior) = behavior(&variable.field_type) else {
                continue;
            };
            let Some(value) = values.get(&variable.name) else {
                debug!("no value for '{}.{}'", setting.name, variable.name);
                continue;
            };

            let id = variable_id(&setting.name, &variable.name);
            let field = view
                .field_mut(&id)
                .ok_or_else(|| FormError::WidgetNotFound(id.clone()))?;
            behavior.write(field, value)?;
        }
    }

    Ok(())
}

/// Read the form back into a payload
///
/// Every setting gets an entry, possibly empty. Variables reading as empty
/// are left out.
pub fn save(schema: &Schema, view: &FormView) -> Result<Payload, FormError> {
    let mut payload = Payload::new();

    for setting in &schema.settings {
        let values = payload.ensure_setting(&setting.name);

        for variable in setting.all_variables() {
            let Some(behavior) = behavior(&variable.field_type) else {
                continue;
            };

            let id = variable_id(&setting.name, &variable.name);
            let field = view
                .field(&id)
                .ok_or_else(|| FormError::WidgetNotFound(id.clone()))?;
            if let Some(value) = behavior.read(field)? {
                values.insert(variable.name.clone(), value);
            }
        }
    }

    Ok(payload)
}

fn field_mut<'a>(view: &'a mut FormView, id: &str) -> Result<&'a mut FieldView, FormError> {
    view.field_mut(id)
        .ok_or_else(|| FormError::WidgetNotFound(id.to_string()))
}

fn mismatch(field: &FieldView, expected: &'static str) -> FormError {
    FormError::WidgetMismatch {
        id: field.id.clone(),
        expected,
        found: field.widget.kind_name(),
    }
}

/// Apply text typed into an input
pub fn set_input(view: &mut FormView, id: &str, text: String) -> Result<(), FormError> {
    let field = field_mut(view, id)?;
    match &mut field.widget {
        Widget::Input { value, .. } => {
            *value = text;
            Ok(())
        }
        _ => Err(mismatch(field, "input")),
    }
}

pub fn set_checked(view: &mut FormView, id: &str, checked: bool) -> Result<(), FormError> {
    let field = field_mut(view, id)?;
    match &mut field.widget {
        Widget::Checkbox { checked: current } => {
            *current = checked;
            Ok(())
        }
        _ => Err(mismatch(field, "checkbox")),
    }
}

/// Select an option by index; an index out of range clears the selection
pub fn select_choice(view: &mut FormView, id: &str, index: usize) -> Result<(), FormError> {
    let field = field_mut(view, id)?;
    match &mut field.widget {
        Widget::Select { options, selected } => {
            *selected = (index < options.len()).then_some(index);
            Ok(())
        }
        _ => Err(mismatch(field, "select")),
    }
}

/// Apply text typed into the free-text side of a network combo
pub fn set_network_text(view: &mut FormView, id: &str, text: String) -> Result<(), FormError> {
    let field = field_mut(view, id)?;
    match &mut field.widget {
        Widget::Network(combo) => {
            combo.select_text(text);
            Ok(())
        }
        _ => Err(mismatch(field, "network combo")),
    }
}

/// Apply an option picked from the select side of a network combo
///
/// Returns whether the index named an option.
pub fn pick_network(view: &mut FormView, id: &str, index: usize) -> Result<bool, FormError> {
    let field = field_mut(view, id)?;
    match &mut field.widget {
        Widget::Network(combo) => Ok(combo.pick(index)),
        _ => Err(mismatch(field, "network combo")),
    }
}

/// Whether the form holds at least one network combo
pub fn has_network_field(view: &FormView) -> bool {
    view.fields()
        .any(|field| matches!(field.widget, Widget::Network(_)))
}
