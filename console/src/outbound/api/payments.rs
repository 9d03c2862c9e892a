//! Payment endpoints over the generic transport.

use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::client::{ApiClient, IDEMPOTENCY_KEY_HEADER, REQUEST_ID_HEADER, RequestOptions};
use super::dto::{PaymentDraftDto, PaymentDto};
use crate::domain::error::ApiError;
use crate::domain::payment::{Payment, PaymentDraft, PaymentStatusQuery};
use crate::domain::ports::{CallOptions, PaymentGateway};

/// Characters escaped in caller-supplied path segments; RFC 3986 unreserved
/// characters pass through.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Reqwest-backed implementation of [`PaymentGateway`].
pub struct PaymentsApi {
    client: Arc<ApiClient>,
}

impl PaymentsApi {
    /// Adapter over a shared transport client.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

fn call_headers(options: &CallOptions) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    if let Some(key) = &options.idempotency_key {
        headers.push((IDEMPOTENCY_KEY_HEADER.to_owned(), key.to_string()));
    }
    if let Some(request_id) = &options.request_id {
        headers.push((REQUEST_ID_HEADER.to_owned(), request_id.clone()));
    }
    headers
}

fn request_options(options: &CallOptions) -> RequestOptions {
    RequestOptions {
        headers: call_headers(options),
        cancel: options.cancel.clone(),
        ..RequestOptions::default()
    }
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

fn status_path(query: &PaymentStatusQuery) -> String {
    format!(
        "/payments/{}/{}/status",
        encode_segment(&query.provider),
        encode_segment(&query.provider_ref)
    )
}

#[async_trait]
impl PaymentGateway for PaymentsApi {
    async fn create_payment(
        &self,
        draft: &PaymentDraft,
        options: &CallOptions,
    ) -> Result<Payment, ApiError> {
        let body = serde_json::to_value(PaymentDraftDto::from(draft)).map_err(|source| {
            ApiError::unknown(format!("failed to serialize creation payload: {source}"))
                .with_source(source)
        })?;
        let created = self
            .client
            .post::<PaymentDto>("/payments", body, request_options(options))
            .await?;
        Ok(created.data.into())
    }

    async fn payment_status(
        &self,
        query: &PaymentStatusQuery,
        options: &CallOptions,
    ) -> Result<Payment, ApiError> {
        let fetched = self
            .client
            .get::<PaymentDto>(&status_path(query), request_options(options))
            .await?;
        Ok(fetched.data.into())
    }
}
