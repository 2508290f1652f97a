use serde::{Deserialize, Deserializer, Serialize};
use serde_valid::Validate;
use std::collections::HashSet;

use crate::error::SchemaError;

/// Type of a configurable variable
///
/// Deserialized from the schema's `type` string. Unknown names are kept as
/// `Unsupported` so the form can skip them instead of rejecting the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Username,
    Password,
    Hostname,
    Port,
    Checkbox,
    DeviceId,
    Text,
    Choice,
    Ssid,
    Unsupported(String),
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "username" => Self::Username,
            "password" => Self::Password,
            "hostname" => Self::Hostname,
            "port" => Self::Port,
            "checkbox" => Self::Checkbox,
            "device_id" => Self::DeviceId,
            "string" => Self::Text,
            "choice" => Self::Choice,
            "ssid" => Self::Ssid,
            _ => Self::Unsupported(name),
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Username => "username".to_string(),
            FieldType::Password => "password".to_string(),
            FieldType::Hostname => "hostname".to_string(),
            FieldType::Port => "port".to_string(),
            FieldType::Checkbox => "checkbox".to_string(),
            FieldType::DeviceId => "device_id".to_string(),
            FieldType::Text => "string".to_string(),
            FieldType::Choice => "choice".to_string(),
            FieldType::Ssid => "ssid".to_string(),
            FieldType::Unsupported(name) => name,
        }
    }
}

/// One `(value, label)` pair of a `choice` variable
///
/// The schema may carry numeric or string values; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice(#[serde(deserialize_with = "choice_value")] pub String, pub String);

impl Choice {
    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn label(&self) -> &str {
        &self.1
    }
}

fn choice_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "invalid choice value: {other}"
        ))),
    }
}

/// A named, typed form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Variable {
    #[validate(min_length = 1)]
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
}

/// A schema entry: a single variable or a group rendered on one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableEntry {
    Group(Vec<Variable>),
    Single(Variable),
}

impl VariableEntry {
    /// Variables of this entry in row order
    pub fn variables(&self) -> &[Variable] {
        match self {
            Self::Group(vars) => vars,
            Self::Single(var) => std::slice::from_ref(var),
        }
    }
}

/// A named, titled group of variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Setting {
    #[validate(min_length = 1)]
    pub name: String,
    pub title: String,
    pub variables: Vec<VariableEntry>,
}

impl Setting {
    /// All variables of this setting, flattening groups
    pub fn all_variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter().flat_map(VariableEntry::variables)
    }
}

/// Ordered list of settings, parsed once and never mutated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub settings: Vec<Setting>,
}

impl Schema {
    /// Parse and validate a schema from its JSON description
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Check names are non-empty and unique within their scope
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut setting_names = HashSet::new();

        for setting in &self.settings {
            Validate::validate(setting)
                .map_err(|e| SchemaError::Invalid(format!("setting '{}': {e}", setting.name)))?;

            if !setting_names.insert(setting.name.as_str()) {
                return Err(SchemaError::DuplicateSetting(setting.name.clone()));
            }

            let mut variable_names = HashSet::new();
            for variable in setting.all_variables() {
                Validate::validate(variable).map_err(|e| {
                    SchemaError::Invalid(format!("variable in '{}': {e}", setting.name))
                })?;

                if !variable_names.insert(variable.name.as_str()) {
                    return Err(SchemaError::DuplicateVariable {
                        setting: setting.name.clone(),
                        variable: variable.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn setting(&self, name: &str) -> Option<&Setting> {
        self.settings.iter().find(|s| s.name == name)
    }

    /// Iterate `(setting, variable)` pairs in schema order
    pub fn variables(&self) -> impl Iterator<Item = (&Setting, &Variable)> {
        self.settings
            .iter()
            .flat_map(|setting| setting.all_variables().map(move |var| (setting, var)))
    }
}

/// Element id of a variable's widget: `${setting}_${variable}`
pub fn variable_id(setting: &str, variable: &str) -> String {
    format!("{setting}_{variable}")
}
