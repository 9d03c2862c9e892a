//! Payment entity and the payloads of its two operations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle state reported by the payment backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

impl PaymentStatus {
    /// Wire form of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simulated payment as the console works with it.
///
/// ## Invariants
/// - `id` is unique within a store collection; reconciliation replaces an
///   existing entry in place and prepends unknown ones.
/// - `amount` is treated as an opaque non-negative number; the core does not
///   validate it further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Server-assigned opaque identifier.
    pub id: String,
    /// Provider tag from an open-ended set (`mock`, `stripe`, ...).
    pub provider: String,
    /// External reference used for status lookups.
    pub provider_ref: String,
    /// Amount in the currency's unit; opaque to the core.
    pub amount: f64,
    /// Three-letter currency code.
    pub currency: String,
    /// Current lifecycle state.
    pub status: PaymentStatus,
    /// Arbitrary key/value annotations, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a simulated payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub provider: String,
    pub amount: f64,
    pub currency: String,
    /// Free-form operator note.
    pub description: Option<String>,
    /// Arbitrary annotations forwarded verbatim.
    pub meta: Option<Map<String, Value>>,
}

impl PaymentDraft {
    /// Draft with only the required fields set.
    pub fn new(
        provider: impl Into<String>,
        amount: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            amount,
            currency: currency.into(),
            description: None,
            meta: None,
        }
    }
}

/// Coordinates of a status lookup: the provider plus its reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentStatusQuery {
    pub provider: String,
    pub provider_ref: String,
}

impl PaymentStatusQuery {
    pub fn new(provider: impl Into<String>, provider_ref: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            provider_ref: provider_ref.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn payment_serializes_with_camel_case_keys() {
        let payment = crate::test_support::payment("pay_1", PaymentStatus::Pending);
        let value = serde_json::to_value(&payment).expect("payment serializes");
        assert!(value.get("providerRef").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("provider_ref").is_none());
    }

    #[test]
    fn status_round_trips_through_its_wire_form() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Succeeded,
            PaymentStatus::Failed,
        ] {
            let encoded = serde_json::to_value(status).expect("status serializes");
            assert_eq!(encoded, json!(status.as_str()));
            let decoded: PaymentStatus =
                serde_json::from_value(encoded).expect("status deserializes");
            assert_eq!(decoded, status);
        }
    }
}
