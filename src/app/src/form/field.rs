//! Per-type widget behavior
//!
//! Each variable type maps to one `FieldBehavior` that knows how to build its
//! widget and how to move values between the widget and the payload.

use crate::error::FormError;
use crate::types::{
    FieldType, FieldView, InputKind, NetworkCombo, SelectOption, Value, Variable, Widget,
};

/// Prefix shown in front of the device identifier
pub const DEVICE_ID_PREFIX: &str = "homething-";

pub trait FieldBehavior: Sync {
    /// Grid width of the field, `None` for full width
    fn columns(&self) -> Option<u8> {
        None
    }

    fn widget(&self, id: &str, variable: &Variable) -> Widget;

    /// Read the widget; `None` stands for an empty read and is left out of
    /// the payload
    fn read(&self, field: &FieldView) -> Result<Option<Value>, FormError>;

    fn write(&self, field: &mut FieldView, value: &Value) -> Result<(), FormError>;
}

/// Behavior for a variable type, `None` for types the form does not render
pub fn behavior(field_type: &FieldType) -> Option<&'static dyn FieldBehavior> {
    match field_type {
        FieldType::Username => Some(&USERNAME),
        FieldType::Password => Some(&PASSWORD),
        FieldType::Hostname => Some(&HOSTNAME),
        FieldType::Text => Some(&TEXT),
        FieldType::Port => Some(&PortField),
        FieldType::Checkbox => Some(&CheckboxField),
        FieldType::DeviceId => Some(&DeviceIdField),
        FieldType::Choice => Some(&ChoiceField),
        FieldType::Ssid => Some(&SsidField),
        FieldType::Unsupported(_) => None,
    }
}

fn mismatch(field: &FieldView, expected: &'static str) -> FormError {
    FormError::WidgetMismatch {
        id: field.id.clone(),
        expected,
        found: field.widget.kind_name(),
    }
}

fn input_value<'a>(field: &'a FieldView) -> Result<&'a str, FormError> {
    match &field.widget {
        Widget::Input { value, .. } => Ok(value),
        _ => Err(mismatch(field, "input")),
    }
}

fn set_input_value(field: &mut FieldView, text: String) -> Result<(), FormError> {
    match &mut field.widget {
        Widget::Input { value, .. } => {
            *value = text;
            Ok(())
        }
        _ => Err(mismatch(field, "input")),
    }
}

/// The integer at the start of `text`, ignoring whatever follows it
///
/// `"3.5"` reads as 3 and `"80 tcp"` as 80, like a browser's `parseInt`.
fn leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits_len = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    if digits_len == 0 {
        return None;
    }
    text[..sign_len + digits_len].parse().ok()
}

fn non_empty(text: &str) -> Option<Value> {
    (!text.is_empty()).then(|| Value::Text(text.to_string()))
}

struct TextField {
    kind: InputKind,
    columns: Option<u8>,
}

static USERNAME: TextField = TextField {
    kind: InputKind::Text,
    columns: Some(6),
};
static PASSWORD: TextField = TextField {
    kind: InputKind::Password,
    columns: Some(6),
};
static HOSTNAME: TextField = TextField {
    kind: InputKind::Text,
    columns: Some(9),
};
static TEXT: TextField = TextField {
    kind: InputKind::Text,
    columns: None,
};

impl FieldBehavior for TextField {
    fn columns(&self) -> Option<u8> {
        self.columns
    }

    fn widget(&self, _id: &str, variable: &Variable) -> Widget {
        Widget::input(self.kind, Some(&variable.title))
    }

    fn read(&self, field: &FieldView) -> Result<Option<Value>, FormError> {
        input_value(field).map(non_empty)
    }

    fn write(&self, field: &mut FieldView, value: &Value) -> Result<(), FormError> {
        set_input_value(field, value.display_text())
    }
}

struct PortField;

impl FieldBehavior for PortField {
    fn columns(&self) -> Option<u8> {
        Some(3)
    }

    fn widget(&self, _id: &str, _variable: &Variable) -> Widget {
        Widget::input(InputKind::Number, None)
    }

    /// Text without a leading integer reads as empty and is dropped
    fn read(&self, field: &FieldView) -> Result<Option<Value>, FormError> {
        Ok(leading_int(input_value(field)?).map(Value::Int))
    }

    fn write(&self, field: &mut FieldView, value: &Value) -> Result<(), FormError> {
        set_input_value(field, value.display_text())
    }
}

struct CheckboxField;

impl FieldBehavior for CheckboxField {
    fn columns(&self) -> Option<u8> {
        Some(6)
    }

    fn widget(&self, _id: &str, _variable: &Variable) -> Widget {
        Widget::Checkbox { checked: false }
    }

    fn read(&self, field: &FieldView) -> Result<Option<Value>, FormError> {
        match field.widget {
            Widget::Checkbox { checked } => Ok(Some(Value::Bool(checked))),
            _ => Err(mismatch(field, "checkbox")),
        }
    }

    fn write(&self, field: &mut FieldView, value: &Value) -> Result<(), FormError> {
        match &mut field.widget {
            Widget::Checkbox { checked } => {
                *checked = value.as_bool();
                Ok(())
            }
            _ => Err(mismatch(field, "checkbox")),
        }
    }
}

struct DeviceIdField;

impl FieldBehavior for DeviceIdField {
    fn widget(&self, _id: &str, variable: &Variable) -> Widget {
        Widget::input(InputKind::ReadOnly, Some(&variable.title))
    }

    /// The identifier belongs to the device and is never sent back
    fn read(&self, _field: &FieldView) -> Result<Option<Value>, FormError> {
        Ok(None)
    }

    fn write(&self, field: &mut FieldView, value: &Value) -> Result<(), FormError> {
        set_input_value(field, format!("{DEVICE_ID_PREFIX}{}", value.display_text()))
    }
}

struct ChoiceField;

impl FieldBehavior for ChoiceField {
    /// A fresh select shows its first option, like a browser does
    fn widget(&self, _id: &str, variable: &Variable) -> Widget {
        let options: Vec<SelectOption> = variable
            .choices
            .iter()
            .map(|choice| SelectOption {
                value: choice.value().to_string(),
                label: choice.label().to_string(),
            })
            .collect();
        let selected = (!options.is_empty()).then_some(0);

        Widget::Select { options, selected }
    }

    fn read(&self, field: &FieldView) -> Result<Option<Value>, FormError> {
        match &field.widget {
            Widget::Select { options, selected } => Ok(selected
                .and_then(|index| options.get(index))
                .and_then(|option| option.value.trim().parse::<i64>().ok())
                .map(Value::Int)),
            _ => Err(mismatch(field, "select")),
        }
    }

    fn write(&self, field: &mut FieldView, value: &Value) -> Result<(), FormError> {
        let wanted = value.display_text();
        match &mut field.widget {
            Widget::Select { options, selected } => {
                *selected = options.iter().position(|o| o.value == wanted);
                Ok(())
            }
            _ => Err(mismatch(field, "select")),
        }
    }
}

struct SsidField;

impl FieldBehavior for SsidField {
    fn widget(&self, id: &str, _variable: &Variable) -> Widget {
        Widget::Network(NetworkCombo::new(format!("{id}-options")))
    }

    fn read(&self, field: &FieldView) -> Result<Option<Value>, FormError> {
        match &field.widget {
            Widget::Network(combo) => Ok(non_empty(&combo.text)),
            _ => Err(mismatch(field, "network combo")),
        }
    }

    fn write(&self, field: &mut FieldView, value: &Value) -> Result<(), FormError> {
        match &mut field.widget {
            Widget::Network(combo) => {
                combo.select_text(value.display_text());
                Ok(())
            }
            _ => Err(mismatch(field, "network combo")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_int_stops_at_the_first_non_digit() {
        assert_eq!(leading_int("3.5"), Some(3));
        assert_eq!(leading_int(" 8080 "), Some(8080));
        assert_eq!(leading_int("80 tcp"), Some(80));
        assert_eq!(leading_int("-12"), Some(-12));
        assert_eq!(leading_int("+7"), Some(7));
    }

    #[test]
    fn leading_int_needs_a_digit_first() {
        assert_eq!(leading_int("eighty"), None);
        assert_eq!(leading_int(".5"), None);
        assert_eq!(leading_int("-"), None);
        assert_eq!(leading_int(""), None);
    }
}
