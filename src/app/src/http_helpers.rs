//! HTTP helper functions for Crux Core
//!
//! Response handling shared by the config and wifi scan requests, kept out
//! of the update handlers so it stays debuggable and testable.

use crux_http::http::StatusCode;
use crux_http::Response;

use crate::codec::WireFormat;
use crate::types::Payload;

/// Base URL for device endpoints.
///
/// NOTE: This is a dummy prefix required because `crux_http` (v0.16.0-rc2) requires
/// absolute URLs and rejects relative paths (`RelativeUrlWithoutBase` error).
/// The shell strips this prefix before sending requests via `fetch()`, so
/// requests stay relative to the device's own page.
pub const BASE_URL: &str = "https://relative";

/// Constructs the full address from a given endpoint.
///
/// # Example
/// ```
/// use homething_provisioning_core::http_helpers::build_url;
/// let url = build_url("/config");
/// assert_eq!(url, "https://relative/config");
/// ```
pub fn build_url(endpoint: &str) -> String {
    format!("{BASE_URL}{endpoint}")
}

/// Returns `true` if the response status is 2xx.
pub fn is_response_success(response: &Response<Vec<u8>>) -> bool {
    response.status().is_success()
}

/// Map a transport error to a user-facing message
pub fn map_http_error(action: &str, error: crux_http::HttpError) -> String {
    format!("{action} failed: {error}")
}

/// Take the body as text, `None` if it is missing, empty or not UTF-8
fn body_text(response: &mut Response<Vec<u8>>) -> Option<String> {
    response
        .take_body()
        .and_then(|body| String::from_utf8(body).ok())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn status_line(status: StatusCode) -> String {
    format!("HTTP {} {}", u16::from(status), status.canonical_reason())
}

/// Extracts error message from HTTP response.
///
/// The device replies with a plain text reason; fall back to the status line.
pub fn extract_error_message(action: &str, response: &mut Response<Vec<u8>>) -> String {
    let status = response.status();
    match body_text(response) {
        Some(text) => text,
        None => format!("{action} failed: {}", status_line(status)),
    }
}

/// Parse JSON from response body.
///
/// Invalid UTF-8 is replaced rather than rejected: devices send SSIDs as raw
/// bytes, and one odd name must not hide the rest of a scan.
/// Returns error if response is not successful or JSON parsing fails.
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    response: &mut Response<Vec<u8>>,
) -> Result<T, String> {
    if !is_response_success(response) {
        return Err(extract_error_message(action, response));
    }

    match response.take_body() {
        Some(body) => serde_json::from_str(&String::from_utf8_lossy(&body))
            .map_err(|e| format!("{action}: JSON parse error: {e}")),
        None => Err(format!("{action}: Empty response body")),
    }
}

/// Process HTTP response result and parse JSON
pub fn process_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<T, String> {
    match result {
        Ok(mut response) => parse_json_response(action, &mut response),
        Err(e) => Err(map_http_error(action, e)),
    }
}

/// Decode a config payload, picking the codec from the response `Content-Type`
pub fn parse_payload_response(
    action: &str,
    response: &mut Response<Vec<u8>>,
) -> Result<Payload, String> {
    if !is_response_success(response) {
        return Err(extract_error_message(action, response));
    }

    let format = WireFormat::from_content_type(
        response
            .content_type()
            .as_ref()
            .map(|mime| mime.essence()),
    );

    match response.take_body() {
        Some(body) => format
            .decode(&body)
            .map_err(|e| format!("{action}: {e}")),
        None => Err(format!("{action}: Empty response body")),
    }
}

/// Process HTTP response result and decode a config payload
pub fn process_payload_response(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<Payload, String> {
    match result {
        Ok(mut response) => parse_payload_response(action, &mut response),
        Err(e) => Err(map_http_error(action, e)),
    }
}

/// Process a save response into the message to show
///
/// Only `200 OK` counts as success. The message is the body text, falling
/// back to the status reason (success) or status line (error).
pub fn process_save_response(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<String, String> {
    match result {
        Ok(mut response) if response.status() == StatusCode::Ok => {
            let reason = response.status().canonical_reason();
            Ok(body_text(&mut response).unwrap_or_else(|| reason.to_string()))
        }
        Ok(mut response) => Err(extract_error_message(action, &mut response)),
        Err(e) => Err(map_http_error(action, e)),
    }
}

/// Handle request creation error - sets error message and returns render command
///
/// This is used when building an HTTP request fails (e.g., payload encoding error).
pub fn handle_request_error<M, E>(
    model: &mut M,
    action: &str,
    error: impl std::fmt::Display,
) -> crux_core::Command<crate::Effect, E>
where
    M: crate::model::ModelErrorHandler,
    E: Send + 'static,
{
    model.set_error(format!("Failed to create {action} request: {error}"));
    crux_core::render::render()
}

// Note: Response objects are built through the shell protocol in tests, so
// these helpers are exercised by the app tests in `tests.rs`.
