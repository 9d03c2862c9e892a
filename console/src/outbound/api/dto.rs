//! Wire DTOs for the payment backend (snake_case JSON).
//!
//! The backend and the console disagree only on mechanical field naming;
//! these types own the rename at the boundary so domain types never carry
//! serde attributes for someone else's convention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::payment::{Payment, PaymentDraft, PaymentStatus};

/// Payment as the backend serializes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDto {
    pub id: String,
    pub provider: String,
    pub provider_ref: String,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PaymentDto> for Payment {
    fn from(dto: PaymentDto) -> Self {
        Self {
            id: dto.id,
            provider: dto.provider,
            provider_ref: dto.provider_ref,
            amount: dto.amount,
            currency: dto.currency,
            status: dto.status,
            meta: dto.meta,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

impl From<&Payment> for PaymentDto {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id.clone(),
            provider: payment.provider.clone(),
            provider_ref: payment.provider_ref.clone(),
            amount: payment.amount,
            currency: payment.currency.clone(),
            status: payment.status,
            meta: payment.meta.clone(),
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        }
    }
}

/// Creation payload as the backend expects it.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentDraftDto {
    pub provider: String,
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl From<&PaymentDraft> for PaymentDraftDto {
    fn from(draft: &PaymentDraft) -> Self {
        Self {
            provider: draft.provider.clone(),
            amount: draft.amount,
            currency: draft.currency.clone(),
            description: draft.description.clone(),
            meta: draft.meta.clone(),
        }
    }
}

/// Pagination block optionally accompanying list envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMetaDto {
    /// Current page, 1-based.
    pub current_page: usize,
    /// Items per page.
    pub per_page: usize,
    /// Total items across all pages.
    pub total: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_page: Option<usize>,
    /// 1-based index of the first item on this page, when the backend sends it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<usize>,
    /// 1-based index of the last item on this page, when the backend sends it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<usize>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::payment;

    #[test]
    fn wire_payment_maps_into_the_domain_shape() {
        let body = json!({
            "id": "pay_9",
            "provider": "mock",
            "provider_ref": "ref_9",
            "amount": 125.5,
            "currency": "IDR",
            "status": "succeeded",
            "created_at": "2024-01-05T10:15:00Z",
            "updated_at": "2024-01-05T10:20:00Z"
        });

        let dto: PaymentDto = serde_json::from_value(body).expect("wire payment decodes");
        let payment = Payment::from(dto);
        assert_eq!(payment.id, "pay_9");
        assert_eq!(payment.provider_ref, "ref_9");
        assert_eq!(payment.status, PaymentStatus::Succeeded);
        assert!(payment.meta.is_none());
    }

    #[test]
    fn domain_payment_serializes_back_to_snake_case() {
        let dto = PaymentDto::from(&payment("pay_1", PaymentStatus::Pending));
        let value = serde_json::to_value(dto).expect("wire payment serializes");
        assert!(value.get("provider_ref").is_some());
        assert!(value.get("providerRef").is_none());
    }

    #[test]
    fn draft_omits_absent_optional_fields() {
        let draft = PaymentDraft::new("mock", 50.0, "USD");
        let value = serde_json::to_value(PaymentDraftDto::from(&draft))
            .expect("draft serializes");
        assert_eq!(
            value,
            json!({"provider": "mock", "amount": 50.0, "currency": "USD"})
        );
    }

    #[test]
    fn list_meta_tolerates_missing_optionals() {
        let meta: ListMetaDto = serde_json::from_value(json!({
            "current_page": 2,
            "per_page": 20,
            "total": 57
        }))
        .expect("list meta decodes");
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.last_page, None);
    }
}
