//! Ports between the stores and their data sources.
//!
//! Stores are written against these traits only; the reqwest adapter and the
//! in-memory directory are interchangeable with mocks in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::cancel::CancelToken;
use crate::domain::error::ApiError;
use crate::domain::idempotency::IdempotencyKey;
use crate::domain::payment::{Payment, PaymentDraft, PaymentStatusQuery};
use crate::domain::user::{User, UserDraft, UserUpdate};

/// Per-call options a store forwards to its gateway.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Dedup token for creation requests; forwarded, never interpreted.
    pub idempotency_key: Option<IdempotencyKey>,
    /// Overrides the generated tracing identifier for this call.
    pub request_id: Option<String>,
    /// External cancellation, combined with the transport timeout.
    pub cancel: Option<CancelToken>,
}

/// Port to the payment backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Ask the backend to create a simulated payment.
    async fn create_payment(
        &self,
        draft: &PaymentDraft,
        options: &CallOptions,
    ) -> Result<Payment, ApiError>;

    /// Look up the current state of a payment by provider reference.
    async fn payment_status(
        &self,
        query: &PaymentStatusQuery,
        options: &CallOptions,
    ) -> Result<Payment, ApiError>;
}

/// Errors raised by user directory adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserDirectoryError {
    /// No user exists under the given identifier.
    #[error("user {id} not found")]
    NotFound { id: String },
    /// The backing collection could not be read or written.
    #[error("user directory failure: {message}")]
    Backend { message: String },
}

impl UserDirectoryError {
    /// Helper for missing identifiers.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Helper for backend failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Port for the demo-user collection.
///
/// CRUD-shaped so the store works unchanged whether the data lives in
/// memory, as it does today, or behind a real endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// List users, optionally narrowed by a case-insensitive search over
    /// name and email.
    async fn list(&self, search: Option<String>) -> Result<Vec<User>, UserDirectoryError>;

    /// Create a user; the directory assigns id and timestamps.
    async fn create(&self, draft: &UserDraft) -> Result<User, UserDirectoryError>;

    /// Merge a partial update over an existing user.
    async fn update(&self, id: &str, update: &UserUpdate) -> Result<User, UserDirectoryError>;

    /// Delete a user. Deleting an unknown id is not an error.
    async fn delete(&self, id: &str) -> Result<(), UserDirectoryError>;
}
