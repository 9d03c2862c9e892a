//! Payments store: owns the collection and mediates backend calls.
//!
//! State lives in a watch channel; every mutation publishes a fresh
//! snapshot to subscribers. Operations toggle their in-flight flag before
//! the round trip and reconcile the returned entity afterwards. The store
//! does not serialize overlapping operations against each other:
//! reconciliation is last-write-wins per payment id, and a slower earlier
//! request may overwrite a faster later one. Views are expected to disable
//! the triggering controls while a flag is set.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use crate::domain::payment::{Payment, PaymentDraft, PaymentStatusQuery};
use crate::domain::ports::{CallOptions, PaymentGateway};

const FALLBACK_ERROR: &str = "Unexpected error when communicating with the payment API.";

/// Snapshot of the payments view state.
#[derive(Debug, Clone, Default)]
pub struct PaymentsState {
    /// Known payments, newest first.
    pub payments: Vec<Payment>,
    /// A creation call is in flight.
    pub is_creating: bool,
    /// A status refresh is in flight.
    pub is_refreshing: bool,
    /// Displayable failure from the most recent operation, if any.
    pub error: Option<String>,
}

/// Store owning the payment collection for the console.
///
/// Public operations never panic and never return an error type; failures
/// land in the state's `error` slot and the operation yields `None`.
pub struct PaymentsStore<G> {
    gateway: Arc<G>,
    state: Arc<watch::Sender<PaymentsState>>,
}

impl<G> PaymentsStore<G> {
    /// Store over the given gateway, starting empty.
    pub fn new(gateway: Arc<G>) -> Self {
        let (state, _) = watch::channel(PaymentsState::default());
        Self {
            gateway,
            state: Arc::new(state),
        }
    }

    /// Receiver observing every state change.
    pub fn subscribe(&self) -> watch::Receiver<PaymentsState> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> PaymentsState {
        self.state.borrow().clone()
    }

    /// Look up a payment by id.
    pub fn payment_by_id(&self, id: &str) -> Option<Payment> {
        self.state
            .borrow()
            .payments
            .iter()
            .find(|payment| payment.id == id)
            .cloned()
    }

    /// Look up a payment by its `(provider, provider_ref)` pair.
    pub fn payment_by_provider_ref(&self, provider: &str, provider_ref: &str) -> Option<Payment> {
        self.state
            .borrow()
            .payments
            .iter()
            .find(|payment| payment.provider == provider && payment.provider_ref == provider_ref)
            .cloned()
    }

    /// Clear the error slot; in-flight flags are untouched.
    pub fn clear_error(&self) {
        self.state.send_modify(|state| state.error = None);
    }
}

impl<G> Clone for PaymentsStore<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            state: Arc::clone(&self.state),
        }
    }
}

impl<G: PaymentGateway> PaymentsStore<G> {
    /// Create a payment and reconcile it into the collection.
    ///
    /// Returns the created payment, or `None` after recording a displayable
    /// message in the error slot.
    pub async fn create_payment(
        &self,
        draft: PaymentDraft,
        options: CallOptions,
    ) -> Option<Payment> {
        self.state.send_modify(|state| {
            state.is_creating = true;
            state.error = None;
        });

        match self.gateway.create_payment(&draft, &options).await {
            Ok(payment) => {
                self.state.send_modify(|state| {
                    upsert(&mut state.payments, payment.clone());
                    state.is_creating = false;
                });
                Some(payment)
            }
            Err(error) => {
                warn!(error = %error, kind = ?error.kind(), "create payment failed");
                self.state.send_modify(|state| {
                    state.error = Some(error.surface_message(FALLBACK_ERROR));
                    state.is_creating = false;
                });
                None
            }
        }
    }

    /// Refresh a payment's status by provider reference.
    ///
    /// The refreshed payment replaces its entry in place, or is prepended
    /// when the collection does not know it yet.
    pub async fn refresh_payment_status(
        &self,
        query: PaymentStatusQuery,
        options: CallOptions,
    ) -> Option<Payment> {
        self.state.send_modify(|state| {
            state.is_refreshing = true;
            state.error = None;
        });

        match self.gateway.payment_status(&query, &options).await {
            Ok(payment) => {
                self.state.send_modify(|state| {
                    upsert(&mut state.payments, payment.clone());
                    state.is_refreshing = false;
                });
                Some(payment)
            }
            Err(error) => {
                warn!(error = %error, kind = ?error.kind(), "refresh payment status failed");
                self.state.send_modify(|state| {
                    state.error = Some(error.surface_message(FALLBACK_ERROR));
                    state.is_refreshing = false;
                });
                None
            }
        }
    }
}

/// Replace the entry sharing the payment's id, or prepend a new one.
fn upsert(payments: &mut Vec<Payment>, payment: Payment) {
    match payments.iter_mut().find(|existing| existing.id == payment.id) {
        Some(existing) => *existing = payment,
        None => payments.insert(0, payment),
    }
}

#[cfg(test)]
#[path = "payments_tests.rs"]
mod tests;
