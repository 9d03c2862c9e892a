//! Domain entities, errors, and ports of the console core.
//!
//! Purpose: Define the strongly typed vocabulary shared by the transport,
//! the stores, and the views. Types stay free of transport concerns;
//! adapters translate wire shapes at the boundary.
//!
//! Public surface:
//! - `ApiError` / `ApiErrorKind` — the single normalized failure shape.
//! - `Payment` / `User` — the two resource entities and their payloads.
//! - `PaymentFilter` — pure table filtering applied before pagination.
//! - `IdempotencyKey` — retry-safe creation tokens.
//! - `PaymentGateway` / `UserDirectory` — ports the stores are written
//!   against.

pub mod error;
pub mod filter;
pub mod idempotency;
pub mod payment;
pub mod ports;
pub mod user;

pub use self::error::{ApiError, ApiErrorKind, ApiResult, ApiSuccess, ValidationIssue};
pub use self::filter::{PaymentFilter, visible_payments};
pub use self::idempotency::{IdempotencyKey, IdempotencyKeyError, IdempotencyKeyGenerator};
pub use self::payment::{Payment, PaymentDraft, PaymentStatus, PaymentStatusQuery};
pub use self::ports::{CallOptions, PaymentGateway, UserDirectory, UserDirectoryError};
pub use self::user::{EmailAddress, User, UserDraft, UserRole, UserUpdate, UserValidationError};

#[cfg(test)]
pub use self::ports::{MockPaymentGateway, MockUserDirectory};
