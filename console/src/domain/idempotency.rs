//! Idempotency keys for safe retry of creation requests.
//!
//! A key combines a compact UTC timestamp with a random suffix, so retried
//! creations within a short window are recognized by the backend as
//! duplicates instead of minting second resources. Tokens are not globally
//! unique by construction, only unique with overwhelming probability for
//! that dedup window.

use std::fmt;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use rand::rngs::{OsRng, SmallRng};
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const RANDOM_SUFFIX_BYTES: usize = 8;

/// Validation errors for caller-supplied keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdempotencyKeyError {
    /// The key string was empty once trimmed.
    #[error("idempotency key must not be empty")]
    Empty,
}

/// Client-generated token sent via the `Idempotency-Key` header.
///
/// The transport forwards the value verbatim and never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Validate and wrap a caller-supplied key.
    ///
    /// # Errors
    ///
    /// Returns [`IdempotencyKeyError::Empty`] for blank input.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdempotencyKeyError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(IdempotencyKeyError::Empty);
        }
        Ok(Self(raw))
    }

    /// The token string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for IdempotencyKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<IdempotencyKey> for String {
    fn from(value: IdempotencyKey) -> Self {
        value.0
    }
}

impl TryFrom<String> for IdempotencyKey {
    type Error = IdempotencyKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Generator producing time-ordered keys like
/// `payment_20240105T101500Z_6f4c9f3b1a2e4d10`.
pub struct IdempotencyKeyGenerator {
    clock: Arc<dyn Clock>,
}

impl IdempotencyKeyGenerator {
    /// Generator on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Generator on an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Fresh key without a prefix.
    pub fn generate(&self) -> IdempotencyKey {
        self.generate_prefixed(None)
    }

    /// Fresh key with `prefix` joined by an underscore.
    pub fn with_prefix(&self, prefix: &str) -> IdempotencyKey {
        self.generate_prefixed(Some(prefix))
    }

    /// Convenience for payment creation requests.
    pub fn for_payment(&self) -> IdempotencyKey {
        self.with_prefix("payment")
    }

    fn generate_prefixed(&self, prefix: Option<&str>) -> IdempotencyKey {
        let now = self.clock.utc();
        let stamp = now.format("%Y%m%dT%H%M%SZ");
        let suffix = hex::encode(random_suffix(self.clock.as_ref()));
        let token = match prefix {
            Some(prefix) => format!("{prefix}_{stamp}_{suffix}"),
            None => format!("{stamp}_{suffix}"),
        };
        IdempotencyKey(token)
    }
}

impl Default for IdempotencyKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn random_suffix(clock: &dyn Clock) -> [u8; RANDOM_SUFFIX_BYTES] {
    let mut bytes = [0u8; RANDOM_SUFFIX_BYTES];
    if OsRng.try_fill_bytes(&mut bytes).is_err() {
        // Best-effort fallback when the secure source is unavailable.
        let seed = clock.utc().timestamp_nanos_opt().unwrap_or_default() as u64;
        SmallRng::seed_from_u64(seed).fill_bytes(&mut bytes);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_clock;

    #[test]
    fn rejects_blank_keys() {
        assert_eq!(IdempotencyKey::new("  "), Err(IdempotencyKeyError::Empty));
    }

    #[test]
    fn accepts_caller_supplied_keys_verbatim() {
        let key = IdempotencyKey::new("retry-batch-7").expect("valid key");
        assert_eq!(key.as_str(), "retry-batch-7");
    }

    #[test]
    fn generated_key_embeds_the_compact_timestamp() {
        let generator = IdempotencyKeyGenerator::with_clock(fixture_clock());
        let key = generator.generate();
        let (stamp, suffix) = key
            .as_str()
            .split_once('_')
            .expect("timestamp and suffix are underscore-joined");
        assert_eq!(stamp, "20240105T101500Z");
        assert_eq!(suffix.len(), RANDOM_SUFFIX_BYTES * 2);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn prefix_is_joined_in_front() {
        let generator = IdempotencyKeyGenerator::with_clock(fixture_clock());
        let key = generator.for_payment();
        assert!(key.as_str().starts_with("payment_20240105T101500Z_"));
    }

    #[test]
    fn consecutive_keys_differ() {
        let generator = IdempotencyKeyGenerator::with_clock(fixture_clock());
        assert_ne!(generator.generate(), generator.generate());
    }
}
