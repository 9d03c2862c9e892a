//! Response-shape normalization: envelope unwrapping and error bodies.
//!
//! The backend wraps successful payloads in `{"data": ...}` and reports
//! failures as `{"message", "code"?, "errors"?}`. Both shapes are handled
//! here, in one place, so the rest of the crate only ever sees clean
//! payloads and [`ApiError`] values.

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::error::{ApiError, ValidationIssue};

/// Strip the `{"data": ...}` wrapper when present.
///
/// Applies uniformly regardless of endpoint: an object carrying a `data`
/// key yields that nested value, anything else passes through whole.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decode a response body, tolerating an empty one as `null`.
pub(crate) fn parse_json_body(text: &str) -> Result<Value, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text)
}

/// Failure payload as the backend sends it; extra fields are ignored.
#[derive(Debug, Default, Deserialize)]
struct ErrorBodyDto {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    /// Field name to messages, as emitted by the backend's validator.
    #[serde(default)]
    errors: Option<BTreeMap<String, Value>>,
}

fn flatten_validation(errors: BTreeMap<String, Value>) -> Vec<ValidationIssue> {
    errors
        .into_iter()
        .map(|(field, messages)| {
            let messages = match messages {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(text) => text,
                        other => other.to_string(),
                    })
                    .collect(),
                Value::String(text) => vec![text],
                other => vec![other.to_string()],
            };
            ValidationIssue { field, messages }
        })
        .collect()
}

fn fallback_message(status: StatusCode) -> String {
    status.canonical_reason().map_or_else(
        || format!("Request failed with status {}", status.as_u16()),
        ToOwned::to_owned,
    )
}

/// Build the normalized error for a non-success response.
///
/// A malformed non-empty body downgrades the kind to `parse` while keeping
/// the status and its fallback message; an empty body stays an `http` error.
pub(crate) fn http_error_from_parts(
    status: StatusCode,
    request_id: Option<String>,
    body_text: &str,
    url: &str,
    method: &str,
) -> ApiError {
    match parse_json_body(body_text) {
        Err(source) => ApiError::parse(status.as_u16(), fallback_message(status))
            .with_endpoint(url, method)
            .with_request_id(request_id)
            .with_source(source),
        Ok(body) => {
            let dto: ErrorBodyDto = serde_json::from_value(body.clone()).unwrap_or_default();
            let message = dto
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| fallback_message(status));
            let mut error = ApiError::http(status.as_u16(), message)
                .with_endpoint(url, method)
                .with_request_id(request_id)
                .with_code(dto.code)
                .with_validation(dto.errors.map(flatten_validation).unwrap_or_default());
            if !body.is_null() {
                error = error.with_raw(body);
            }
            error
        }
    }
}
