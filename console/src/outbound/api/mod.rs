//! Generic API transport plus the payment endpoint adapter.
//!
//! `client` owns request execution and error normalization, `envelope`
//! normalizes response shapes, `dto` carries the wire field naming, and
//! `payments` binds the domain endpoints onto the transport.

pub mod client;
pub mod dto;
pub mod envelope;
pub mod payments;

pub use client::{
    ApiClient, IDEMPOTENCY_KEY_HEADER, InitError, REQUEST_ID_HEADER, RequestOptions, build_url,
};
pub use envelope::unwrap_envelope;
pub use payments::PaymentsApi;
