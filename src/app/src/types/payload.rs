use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A single configuration value as exchanged with the device
///
/// Serializes to the natural type of the target format. Bytes are written as
/// raw binary by compact formats and as lowercase hex by human readable ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Bool(bool),
    Int(i64),
    Bytes(Vec<u8>),
}

impl Value {
    /// Text shown in a widget when this value is written into it
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Bytes(bytes) => to_hex(bytes),
        }
    }

    /// Truthiness as a browser checkbox would apply it
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Text(s) => !s.is_empty(),
            Self::Bytes(bytes) => !bytes.is_empty(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Bytes(bytes) if serializer.is_human_readable() => {
                serializer.serialize_str(&to_hex(bytes))
            }
            Self::Bytes(bytes) => serializer.serialize_bytes(bytes),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, boolean, integer or byte string")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| E::custom(format!("integer {v} out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        // JSON producers may print whole numbers with a fraction
        if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
            Ok(Value::Int(v as i64))
        } else {
            Err(E::custom(format!("non-integer number {v}")))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::Text(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Value, E> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Value, E> {
        Ok(Value::Bytes(v))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Sparse two-level mapping: setting name -> variable name -> value
///
/// An absent key means "leave unset", never "set to empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(pub BTreeMap<String, BTreeMap<String, Value>>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, setting: &str, variable: &str) -> Option<&Value> {
        self.0.get(setting)?.get(variable)
    }

    pub fn setting(&self, setting: &str) -> Option<&BTreeMap<String, Value>> {
        self.0.get(setting)
    }

    /// Make sure a setting entry exists, even when it ends up empty
    pub fn ensure_setting(&mut self, setting: &str) -> &mut BTreeMap<String, Value> {
        self.0.entry(setting.to_string()).or_default()
    }

    pub fn insert(&mut self, setting: &str, variable: &str, value: impl Into<Value>) {
        self.ensure_setting(setting)
            .insert(variable.to_string(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_numbers_become_integers() {
        let value: Value = serde_json::from_str("8080").unwrap();
        assert_eq!(value, Value::Int(8080));

        let value: Value = serde_json::from_str("3.0").unwrap();
        assert_eq!(value, Value::Int(3));

        assert!(serde_json::from_str::<Value>("2.5").is_err());
    }

    #[test]
    fn bytes_are_hex_in_json() {
        let json = serde_json::to_string(&Value::Bytes(vec![0xa0, 0x0b, 0xff])).unwrap();
        assert_eq!(json, r#""a00bff""#);
    }

    #[test]
    fn checkbox_truthiness() {
        assert!(Value::Int(1).as_bool());
        assert!(!Value::Int(0).as_bool());
        assert!(!Value::Text(String::new()).as_bool());
        assert!(Value::Bool(true).as_bool());
    }

    #[test]
    fn payload_lookup_is_two_level() {
        let mut payload = Payload::new();
        payload.insert("mqtt", "port", 1883_i64);
        payload.ensure_setting("log");

        assert_eq!(payload.get("mqtt", "port"), Some(&Value::Int(1883)));
        assert_eq!(payload.get("mqtt", "host"), None);
        assert!(payload.setting("log").is_some_and(BTreeMap::is_empty));
    }
}
