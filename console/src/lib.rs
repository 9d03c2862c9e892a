//! Client-side core for a payment-simulation admin console.
//!
//! Purpose: own everything between the rendering shell and the payment
//! backend — a generic HTTP transport with one normalized error shape,
//! observable stores for the payment and user collections, pure pagination
//! and filtering arithmetic, idempotency tokens for retried creations, and
//! a small keyboard-shortcut registry. The shell subscribes to store
//! snapshots, calls store operations on user input, and formats whatever
//! the core computed; the core performs no rendering and no locale-aware
//! formatting.
//!
//! Public surface:
//! - [`ApiClient`] — transport bound to one base endpoint.
//! - [`stores::PaymentsStore`] / [`stores::UsersStore`] — observable state.
//! - [`domain`] — entities, the [`ApiError`] taxonomy, and the ports.
//! - [`CancelToken`] — cooperative cancellation, derivable from parents.

pub mod cancel;
pub mod config;
pub mod domain;
pub mod outbound;
pub mod shortcuts;
pub mod stores;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use cancel::CancelToken;
pub use config::{ClientConfig, ConfigError};
pub use domain::{ApiError, ApiErrorKind, ApiResult, ApiSuccess};
pub use outbound::api::{ApiClient, InitError, PaymentsApi, RequestOptions};
pub use outbound::directory::InMemoryUserDirectory;
pub use stores::{PaymentsStore, UsersStore};
