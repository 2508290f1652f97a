//! Wire codecs for the config payload
//!
//! Devices accept either JSON or a compact MessagePack map. Both encode the
//! same `Payload` shape and are selected by content type.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::types::Payload;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const MSGPACK_CONTENT_TYPE: &str = "application/msgpack";

const MSGPACK_ALIASES: [&str; 3] = [
    MSGPACK_CONTENT_TYPE,
    "application/x-msgpack",
    "application/vnd.msgpack",
];

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum WireFormat {
    #[default]
    Json,
    MessagePack,
}

impl WireFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => JSON_CONTENT_TYPE,
            Self::MessagePack => MSGPACK_CONTENT_TYPE,
        }
    }

    /// Pick the codec for a `Content-Type` header, defaulting to JSON
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let essence = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());

        match essence {
            Some(ct) if MSGPACK_ALIASES.contains(&ct.as_str()) => Self::MessagePack,
            _ => Self::Json,
        }
    }

    /// Whether an `Accept` header asks for MessagePack
    pub fn accepted_by(accept: &str) -> bool {
        accept
            .split(',')
            .any(|part| Self::from_content_type(Some(part)) == Self::MessagePack)
    }

    pub fn encode(self, payload: &Payload) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Json => Ok(serde_json::to_vec(payload)?),
            // Maps keyed by name, not positional arrays
            Self::MessagePack => Ok(rmp_serde::to_vec_named(payload)?),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<Payload, CodecError> {
        match self {
            Self::Json => Ok(serde_json::from_slice(bytes)?),
            Self::MessagePack => Ok(rmp_serde::from_slice(bytes)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn sample() -> Payload {
        let mut payload = Payload::new();
        payload.insert("wifi", "ssid", "Home");
        payload.insert("mqtt", "port", 1883_i64);
        payload.insert("log", "enable", false);
        payload
    }

    #[test]
    fn selects_codec_from_content_type() {
        assert_eq!(
            WireFormat::from_content_type(Some("application/msgpack")),
            WireFormat::MessagePack
        );
        assert_eq!(
            WireFormat::from_content_type(Some("Application/X-MsgPack; charset=binary")),
            WireFormat::MessagePack
        );
        assert_eq!(
            WireFormat::from_content_type(Some("application/json")),
            WireFormat::Json
        );
        assert_eq!(WireFormat::from_content_type(None), WireFormat::Json);
    }

    #[test]
    fn accept_header_may_list_msgpack_anywhere() {
        assert!(WireFormat::accepted_by("application/json, application/msgpack"));
        assert!(!WireFormat::accepted_by("*/*"));
    }

    #[test]
    fn both_codecs_decode_to_the_same_payload() {
        let payload = sample();

        for format in [WireFormat::Json, WireFormat::MessagePack] {
            let bytes = format.encode(&payload).unwrap();
            assert_eq!(format.decode(&bytes).unwrap(), payload);
        }
    }

    #[test]
    fn msgpack_keeps_device_id_as_bytes() {
        let mut payload = Payload::new();
        payload.insert("device", "id", Value::Bytes(vec![0xa0, 0xb1, 0xc2]));

        let bytes = WireFormat::MessagePack.encode(&payload).unwrap();
        let decoded = WireFormat::MessagePack.decode(&bytes).unwrap();
        assert_eq!(
            decoded.get("device", "id"),
            Some(&Value::Bytes(vec![0xa0, 0xb1, 0xc2]))
        );

        let json = WireFormat::Json.encode(&payload).unwrap();
        assert_eq!(json, br#"{"device":{"id":"a0b1c2"}}"#.to_vec());
    }

    #[test]
    fn json_decode_reports_malformed_body() {
        assert!(matches!(
            WireFormat::Json.decode(b"{\"wifi\": 1}"),
            Err(CodecError::Json(_))
        ));
    }
}
