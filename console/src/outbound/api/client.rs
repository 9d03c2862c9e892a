//! Reqwest-backed transport for the console API.
//!
//! Owns URL resolution, default headers, tracing identifiers, timeout and
//! cancellation plumbing, and the mapping of every failure mode into
//! [`ApiError`]. Callers receive the outcome as data; the only failures that
//! escalate are construction errors such as a missing base URL.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::envelope::{http_error_from_parts, parse_json_body, unwrap_envelope};
use crate::cancel::CancelToken;
use crate::config::{ClientConfig, ConfigError};
use crate::domain::error::{ApiError, ApiResult, ApiSuccess};

/// Header carrying the per-request tracing identifier.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";
/// Header carrying the caller-supplied idempotency token.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Fatal client construction failures.
#[derive(Debug, Error)]
pub enum InitError {
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A configured default header cannot be represented on the wire.
    #[error("invalid default header `{name}`")]
    InvalidHeader { name: String },
    /// The underlying HTTP client could not be constructed.
    #[error("failed to construct HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Per-call request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters; `None` values are omitted entirely.
    pub query: Vec<(String, Option<String>)>,
    /// Extra headers; they win over client defaults on conflict.
    pub headers: Vec<(String, String)>,
    /// External cancellation, combined with the internal timeout.
    pub cancel: Option<CancelToken>,
    /// Per-call timeout override.
    pub timeout: Option<Duration>,
}

/// Join a base URL and a path with exactly one separating slash.
///
/// Absolute `http(s)://` paths pass through verbatim.
pub fn build_url(base_url: &str, path: &str) -> String {
    if has_absolute_scheme(path) {
        return path.to_owned();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn has_absolute_scheme(path: &str) -> bool {
    let lowered = path.to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

/// HTTP client bound to one base endpoint.
///
/// One instance is shared across the application; per-call state travels in
/// [`RequestOptions`].
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    default_headers: HeaderMap,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::Config`] when the base URL is blank,
    /// [`InitError::InvalidHeader`] for unrepresentable default headers, and
    /// [`InitError::Http`] when reqwest fails to construct its client.
    pub fn new(config: ClientConfig) -> Result<Self, InitError> {
        if config.base_url().trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl.into());
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in config.default_headers() {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|_| InitError::InvalidHeader {
                    name: name.clone(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|_| InitError::InvalidHeader {
                    name: name.clone(),
                })?;
            default_headers.insert(header_name, header_value);
        }

        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: config.base_url().to_owned(),
            default_headers,
            timeout: config.timeout(),
        })
    }

    /// Configured base endpoint.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Execute one request and normalize the outcome.
    ///
    /// The body is serialized only for methods other than GET/HEAD. The
    /// payload is envelope-unwrapped before being returned.
    ///
    /// # Errors
    ///
    /// Every failure mode returns an [`ApiError`]; see its kind taxonomy.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> ApiResult<Value> {
        let url = self.resolve_url(path, &options.query)?;
        let timeout = options.timeout.unwrap_or(self.timeout);
        let headers = self.call_headers(&options.headers)?;

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .headers(headers);
        if let Some(payload) = &body {
            if method != Method::GET && method != Method::HEAD {
                request = request.json(payload);
            }
        }

        debug!(method = %method, url = %url, "api request");
        let exchange = async move {
            let response = request.send().await?;
            let status = response.status();
            let request_id = response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(ToOwned::to_owned);
            let text = response.text().await?;
            Ok::<(StatusCode, Option<String>, String), reqwest::Error>((status, request_id, text))
        };

        let outcome = match &options.cancel {
            Some(cancel) => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        return Err(ApiError::abort("request cancelled by caller")
                            .with_endpoint(url.as_str(), method.as_str()));
                    }
                    outcome = tokio::time::timeout(timeout, exchange) => outcome,
                }
            }
            None => tokio::time::timeout(timeout, exchange).await,
        };

        let (status, request_id, text) = match outcome {
            Err(_) => {
                return Err(ApiError::timeout(format!(
                    "request timed out after {} ms",
                    timeout.as_millis()
                ))
                .with_endpoint(url.as_str(), method.as_str()));
            }
            Ok(Err(source)) => {
                return Err(transport_error(source, url.as_str(), method.as_str()));
            }
            Ok(Ok(parts)) => parts,
        };

        if !status.is_success() {
            debug!(method = %method, url = %url, status = status.as_u16(), "api request failed");
            return Err(http_error_from_parts(
                status,
                request_id,
                &text,
                url.as_str(),
                method.as_str(),
            ));
        }

        match parse_json_body(&text) {
            Ok(decoded) => Ok(ApiSuccess {
                status: status.as_u16(),
                data: unwrap_envelope(decoded),
            }),
            Err(source) => Err(ApiError::parse(
                status.as_u16(),
                "response body was not valid JSON",
            )
            .with_endpoint(url.as_str(), method.as_str())
            .with_request_id(request_id)
            .with_source(source)),
        }
    }

    /// [`ApiClient::request`] plus typed decoding of the unwrapped payload.
    ///
    /// # Errors
    ///
    /// A payload that does not match `T` surfaces as a `parse`-kind error.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let success = self.request(method, path, body, options).await?;
        match serde_json::from_value(success.data) {
            Ok(data) => Ok(ApiSuccess {
                status: success.status,
                data,
            }),
            Err(source) => Err(ApiError::parse(
                success.status,
                format!("response payload did not match the expected shape: {source}"),
            )
            .with_source(source)),
        }
    }

    /// GET a typed payload.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        self.request_as(Method::GET, path, None, options).await
    }

    /// POST a JSON body and decode the typed payload.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
        options: RequestOptions,
    ) -> ApiResult<T> {
        self.request_as(Method::POST, path, Some(body), options).await
    }

    /// PUT a JSON body and decode the typed payload.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
        options: RequestOptions,
    ) -> ApiResult<T> {
        self.request_as(Method::PUT, path, Some(body), options).await
    }

    /// PATCH a JSON body and decode the typed payload.
    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
        options: RequestOptions,
    ) -> ApiResult<T> {
        self.request_as(Method::PATCH, path, Some(body), options).await
    }

    /// DELETE and decode the typed payload.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        self.request_as(Method::DELETE, path, None, options).await
    }

    fn resolve_url(&self, path: &str, query: &[(String, Option<String>)]) -> Result<Url, ApiError> {
        let joined = build_url(&self.base_url, path);
        let mut url = Url::parse(&joined).map_err(|source| {
            ApiError::unknown(format!("invalid request URL `{joined}`: {source}"))
                .with_source(source)
        })?;
        if query.iter().any(|(_, value)| value.is_some()) {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                if let Some(value) = value {
                    pairs.append_pair(key, value);
                }
            }
        }
        Ok(url)
    }

    fn call_headers(&self, extra: &[(String, String)]) -> Result<HeaderMap, ApiError> {
        let mut headers = self.default_headers.clone();
        let request_id = Uuid::new_v4().to_string();
        let request_id_value = HeaderValue::from_str(&request_id)
            .map_err(|_| ApiError::unknown("generated request id is not a valid header value"))?;
        headers.insert(REQUEST_ID_HEADER, request_id_value);

        for (name, value) in extra {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::unknown(format!("invalid header name `{name}`")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ApiError::unknown(format!("invalid value for header `{name}`")))?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }
}

fn transport_error(source: reqwest::Error, url: &str, method: &str) -> ApiError {
    let message = source.to_string();
    let error = if source.is_timeout() {
        ApiError::timeout(message)
    } else if source.is_connect() || source.is_request() {
        ApiError::network(message)
    } else {
        ApiError::unknown(message)
    };
    error.with_endpoint(url, method).with_source(source)
}
