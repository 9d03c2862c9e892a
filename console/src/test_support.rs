//! Canned fixtures shared by unit and integration tests.
//!
//! Compiled for the crate's own tests and, behind the `test-support`
//! feature, for integration tests in `tests/`.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use reqwest::StatusCode;

use crate::domain::error::ApiError;
use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::user::{EmailAddress, User, UserRole};
use crate::outbound::api::dto::PaymentDto;

/// The backend's stock validation failure for a missing amount.
pub const VALIDATION_ERROR_BODY: &str = r#"{"message":"The given data was invalid.","errors":{"amount":["The amount field is required."]}}"#;

/// Timestamp every fixture entity carries: 2024-01-05 10:15:00 UTC.
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 5, 10, 15, 0)
        .single()
        .unwrap_or_else(|| panic!("fixture timestamp must be unambiguous"))
}

/// Clock frozen at [`fixture_timestamp`].
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Shared frozen clock for deterministic timestamps.
pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        now: fixture_timestamp(),
    })
}

/// Mock-provider payment whose reference is derived from its id.
pub fn payment(id: &str, status: PaymentStatus) -> Payment {
    Payment {
        id: id.to_owned(),
        provider: "mock".to_owned(),
        provider_ref: format!("ref_{id}"),
        amount: 150.0,
        currency: "IDR".to_owned(),
        status,
        meta: None,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

/// Success envelope body wrapping the given payment, as the backend sends it.
pub fn payment_envelope_body(payment: &Payment) -> String {
    serde_json::json!({ "data": PaymentDto::from(payment) }).to_string()
}

/// The three demo accounts the simulated directory starts with.
pub fn demo_users() -> Vec<User> {
    let demo = [
        ("u_admin", "Admin Demo", "admin@example.com", UserRole::Admin, true),
        ("u_editor", "Editor Demo", "editor@example.com", UserRole::Editor, true),
        ("u_viewer", "Viewer Demo", "viewer@example.com", UserRole::Viewer, false),
    ];
    demo.into_iter()
        .map(|(id, name, email, role, is_active)| User {
            id: id.to_owned(),
            name: name.to_owned(),
            email: EmailAddress::new(email)
                .unwrap_or_else(|err| panic!("fixture email must be valid: {err}")),
            role,
            is_active,
            created_at: fixture_timestamp(),
            updated_at: fixture_timestamp(),
        })
        .collect()
}

/// The normalized 422 error produced from [`VALIDATION_ERROR_BODY`].
pub fn validation_api_error() -> ApiError {
    crate::outbound::api::envelope::http_error_from_parts(
        StatusCode::UNPROCESSABLE_ENTITY,
        None,
        VALIDATION_ERROR_BODY,
        "https://api.test/payments",
        "POST",
    )
}
