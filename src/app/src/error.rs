//! Error types of the provisioning core

use thiserror::Error;

/// Errors raised while parsing the settings schema
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
    #[error("duplicate setting '{0}'")]
    DuplicateSetting(String),
    #[error("duplicate variable '{variable}' in setting '{setting}'")]
    DuplicateVariable { setting: String, variable: String },
}

/// Errors raised by the form engine
///
/// Both variants mean the rendered form does not match the schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("no widget with id '{0}'")]
    WidgetNotFound(String),
    #[error("widget '{id}' is a {found}, expected a {expected}")]
    WidgetMismatch {
        id: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors raised while encoding or decoding a config payload
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("MessagePack encode: {0}")]
    MessagePackEncode(#[from] rmp_serde::encode::Error),
    #[error("MessagePack decode: {0}")]
    MessagePackDecode(#[from] rmp_serde::decode::Error),
}
