use homething_provisioning_core::{FieldType, Payload, Schema, Value};
use log::{debug, info, warn};
use std::{collections::BTreeMap, sync::Mutex};
use thiserror::Error;

/// Rejections of `POST /config`, worded the way the device firmware words them
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config content length too big")]
    TooLarge,
    #[error("failed to parse buffer")]
    Parse,
    #[error("Failed to extract string variable value")]
    ExtractString,
    #[error("Failed to extract int variable value")]
    ExtractInt,
    #[error("Failed to extract bool variable value")]
    ExtractBool,
    #[error("config store is unavailable")]
    Unavailable,
}

/// Stored config values of a simulated device
///
/// Values are validated against the schema on the way in. Passwords are
/// stored but never handed out, and the device id comes from the hardware.
pub struct ConfigStore {
    schema: Schema,
    device_id: Vec<u8>,
    values: Mutex<Payload>,
}

impl ConfigStore {
    pub fn new(schema: Schema, device_id: Vec<u8>) -> Self {
        Self {
            schema,
            device_id,
            values: Mutex::new(Payload::new()),
        }
    }

    /// Current values as served by `GET /config`
    ///
    /// Every setting of the schema is present, possibly empty.
    pub fn snapshot(&self) -> Result<Payload, ConfigError> {
        let values = self.values.lock().map_err(|_| ConfigError::Unavailable)?;
        let mut payload = Payload::new();

        for setting in &self.schema.settings {
            let out = payload.ensure_setting(&setting.name);

            for variable in setting.all_variables() {
                match variable.field_type {
                    FieldType::Password => {}
                    FieldType::DeviceId => {
                        out.insert(variable.name.clone(), Value::Bytes(self.device_id.clone()));
                    }
                    _ => {
                        if let Some(value) = values.get(&setting.name, &variable.name) {
                            out.insert(variable.name.clone(), value.clone());
                        }
                    }
                }
            }
        }

        Ok(payload)
    }

    /// Validate and store an incoming payload
    ///
    /// Unknown settings and variables are skipped. Nothing is stored unless
    /// every value has the right type.
    pub fn apply(&self, incoming: &Payload) -> Result<(), ConfigError> {
        let mut updates: Vec<(&str, &str, Value)> = Vec::new();

        for setting in &self.schema.settings {
            let Some(values) = incoming.setting(&setting.name) else {
                continue;
            };

            for variable in setting.all_variables() {
                let Some(value) = values.get(&variable.name) else {
                    debug!("no variable {} defined for group {}", variable.name, setting.name);
                    continue;
                };

                if let Some(stored) = coerce(&variable.field_type, value)? {
                    updates.push((setting.name.as_str(), variable.name.as_str(), stored));
                }
            }
        }

        let mut values = self.values.lock().map_err(|_| ConfigError::Unavailable)?;
        for (setting, variable, value) in updates {
            info!("setting {setting}.{variable}");
            values.insert(setting, variable, value);
        }

        Ok(())
    }

    /// Values currently stored for one setting
    pub fn stored(&self, setting: &str) -> Result<BTreeMap<String, Value>, ConfigError> {
        let values = self.values.lock().map_err(|_| ConfigError::Unavailable)?;
        Ok(values.setting(setting).cloned().unwrap_or_default())
    }
}

/// Coerce a value to what the device stores for `field_type`
///
/// Returns `None` for values the device ignores.
fn coerce(field_type: &FieldType, value: &Value) -> Result<Option<Value>, ConfigError> {
    match field_type {
        FieldType::Text
        | FieldType::Ssid
        | FieldType::Username
        | FieldType::Password
        | FieldType::Hostname => match value {
            Value::Text(text) => Ok(Some(Value::Text(text.clone()))),
            _ => Err(ConfigError::ExtractString),
        },
        // Stored as u16 and i32, wrapping like the firmware's casts
        FieldType::Port => match value {
            Value::Int(n) => Ok(Some(Value::Int(i64::from(*n as u16)))),
            _ => Err(ConfigError::ExtractInt),
        },
        FieldType::Choice => match value {
            Value::Int(n) => Ok(Some(Value::Int(i64::from(*n as i32)))),
            _ => Err(ConfigError::ExtractInt),
        },
        FieldType::Checkbox => match value {
            Value::Bool(b) => Ok(Some(Value::Bool(*b))),
            _ => Err(ConfigError::ExtractBool),
        },
        FieldType::DeviceId => Ok(None),
        FieldType::Unsupported(kind) => {
            warn!("ignoring value of unsupported type {kind}");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ConfigStore {
        let schema = Schema::from_json(
            r#"[
                {"name": "wifi", "title": "Wifi", "variables": [
                    {"name": "ssid", "title": "SSID", "type": "ssid"},
                    {"name": "password", "title": "Password", "type": "password"}
                ]},
                {"name": "device", "title": "Device", "variables": [
                    {"name": "id", "title": "ID", "type": "device_id"},
                    {"name": "port", "title": "Port", "type": "port"},
                    {"name": "mode", "title": "Mode", "type": "choice",
                     "choices": [[1, "A"], [2, "B"]]},
                    {"name": "debug", "title": "Debug", "type": "checkbox"}
                ]}
            ]"#,
        )
        .unwrap();
        ConfigStore::new(schema, vec![0xa0, 0xb1, 0xc2, 0xd3, 0xe4, 0xf5])
    }

    #[test]
    fn snapshot_hides_passwords_and_adds_device_id() {
        let store = store();
        let mut payload = Payload::new();
        payload.insert("wifi", "ssid", "Home");
        payload.insert("wifi", "password", "secret");
        store.apply(&payload).unwrap();

        let snapshot = store.snapshot().unwrap();

        assert_eq!(snapshot.get("wifi", "ssid"), Some(&Value::Text("Home".into())));
        assert_eq!(snapshot.get("wifi", "password"), None);
        assert_eq!(
            snapshot.get("device", "id"),
            Some(&Value::Bytes(vec![0xa0, 0xb1, 0xc2, 0xd3, 0xe4, 0xf5]))
        );
        assert_eq!(
            store.stored("wifi").unwrap().get("password"),
            Some(&Value::Text("secret".into()))
        );
    }

    #[test]
    fn wrong_types_are_rejected_without_storing_anything() {
        let store = store();
        let mut payload = Payload::new();
        payload.insert("wifi", "ssid", "Home");
        payload.insert("device", "debug", 1_i64);

        assert_eq!(store.apply(&payload), Err(ConfigError::ExtractBool));
        assert!(store.stored("wifi").unwrap().is_empty());

        let mut payload = Payload::new();
        payload.insert("wifi", "ssid", 5_i64);
        assert_eq!(store.apply(&payload), Err(ConfigError::ExtractString));

        let mut payload = Payload::new();
        payload.insert("device", "port", "80");
        assert_eq!(store.apply(&payload), Err(ConfigError::ExtractInt));
    }

    #[test]
    fn numbers_wrap_like_device_integers() {
        let store = store();
        let mut payload = Payload::new();
        payload.insert("device", "port", 70_000_i64);
        payload.insert("device", "mode", 2_i64);

        store.apply(&payload).unwrap();

        let device = store.stored("device").unwrap();
        assert_eq!(device.get("port"), Some(&Value::Int(4464)));
        assert_eq!(device.get("mode"), Some(&Value::Int(2)));
    }

    #[test]
    fn unknown_settings_variables_and_device_id_are_ignored() {
        let store = store();
        let mut payload = Payload::new();
        payload.insert("mqtt", "host", "broker");
        payload.insert("wifi", "channel", 6_i64);
        payload.insert("device", "id", "ffffffffffff");

        store.apply(&payload).unwrap();

        assert!(store.stored("mqtt").unwrap().is_empty());
        assert!(store.stored("wifi").unwrap().is_empty());
        assert!(store.stored("device").unwrap().is_empty());
    }
}
