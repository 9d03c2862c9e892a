//! Normalized transport error surfaced to every higher layer.
//!
//! The transport returns failures as data rather than panicking or leaking
//! reqwest errors: every failure mode collapses into one [`ApiError`] shape
//! tagged by [`ApiErrorKind`]. Stores and views branch on the kind and read
//! the message; they never unwind across the core boundary.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failure category at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// The server was reached and answered with a non-success status.
    Http,
    /// Connection-level failure (DNS, refused, offline).
    Network,
    /// The client-enforced deadline elapsed before a response arrived.
    Timeout,
    /// The caller cancelled the request.
    Abort,
    /// A body could not be decoded as the JSON shape it should have had.
    Parse,
    /// Anything that fits none of the categories above.
    Unknown,
}

/// One field's messages flattened out of the backend's validation map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Name of the offending request field.
    pub field: String,
    /// Messages the backend attached to that field.
    pub messages: Vec<String>,
}

/// Normalized API failure.
///
/// Constructed at the transport boundary only; deeper layers receive it
/// ready-made and never inspect raw response bodies themselves.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    kind: ApiErrorKind,
    /// HTTP status, or 0 when the failure happened below the HTTP layer.
    status: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    validation: Vec<ValidationIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<Value>,
    #[serde(skip)]
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    fn new(kind: ApiErrorKind, status: u16, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
            code: None,
            validation: Vec::new(),
            request_id: None,
            url: None,
            method: None,
            raw: None,
            source: None,
        }
    }

    /// Server responded with a non-success status.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Http, status, message)
    }

    /// Connection-level failure before any HTTP status existed.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, 0, message)
    }

    /// The client-side deadline elapsed.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Timeout, 0, message)
    }

    /// The caller cancelled the request.
    pub fn abort(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Abort, 0, message)
    }

    /// A body failed to decode; `status` keeps whatever the response carried.
    pub fn parse(status: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, status, message)
    }

    /// Fallback category for unclassifiable failures.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Unknown, 0, message)
    }

    /// Record the request target for diagnostics.
    pub fn with_endpoint(mut self, url: impl Into<String>, method: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self.method = Some(method.into());
        self
    }

    /// Attach the backend's machine-readable error code, if it sent one.
    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    /// Attach flattened validation issues.
    pub fn with_validation(mut self, validation: Vec<ValidationIssue>) -> Self {
        self.validation = validation;
        self
    }

    /// Attach the tracing identifier echoed by the server.
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Keep the decoded error body for logging and fallbacks.
    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Preserve the underlying exception as the error source.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Failure category.
    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// HTTP status, or 0 when no response was received.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Human-readable message suitable for direct display.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Backend error code, if any.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Flattened per-field validation messages.
    pub fn validation(&self) -> &[ValidationIssue] {
        &self.validation
    }

    /// Tracing identifier echoed by the server, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// URL of the failed request, when known.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Method of the failed request, when known.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Decoded error body as the server sent it.
    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    /// Best displayable message: the normalized one, else a `message` field
    /// found in the raw body, else the provided fallback.
    pub fn surface_message(&self, fallback: &str) -> String {
        if !self.message.trim().is_empty() {
            return self.message.clone();
        }
        if let Some(message) = self
            .raw
            .as_ref()
            .and_then(|raw| raw.get("message"))
            .and_then(Value::as_str)
        {
            if !message.trim().is_empty() {
                return message.to_owned();
            }
        }
        fallback.to_owned()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Successful transport outcome: the HTTP status plus the unwrapped payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiSuccess<T> {
    /// HTTP status of the response.
    pub status: u16,
    /// Unwrapped, decoded payload.
    pub data: T,
}

/// Outcome of one transport call; failures travel as data, not panics.
pub type ApiResult<T> = Result<ApiSuccess<T>, ApiError>;
