//! Pure filtering for the payments table, applied before pagination.

use chrono::NaiveDate;
use pagination::Pager;

use crate::domain::payment::{Payment, PaymentStatus};

/// Criteria narrowing the payments collection; `None` fields are wildcards.
///
/// The date range is inclusive on both ends and compares calendar days in
/// UTC, so `date_to` covers the whole of that day regardless of the
/// payment's time-of-day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentFilter {
    pub provider: Option<String>,
    pub status: Option<PaymentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl PaymentFilter {
    /// Whether `payment` satisfies every set criterion.
    pub fn matches(&self, payment: &Payment) -> bool {
        if let Some(provider) = &self.provider {
            if payment.provider != *provider {
                return false;
            }
        }
        if let Some(status) = self.status {
            if payment.status != status {
                return false;
            }
        }
        let created_on = payment.created_at.date_naive();
        if let Some(from) = self.date_from {
            if created_on < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if created_on > to {
                return false;
            }
        }
        true
    }

    /// Payments satisfying the filter, in their original order.
    pub fn apply(&self, payments: &[Payment]) -> Vec<Payment> {
        payments
            .iter()
            .filter(|payment| self.matches(payment))
            .cloned()
            .collect()
    }
}

/// Rows a table view renders: filter first, then the pager's window.
pub fn visible_payments(
    payments: &[Payment],
    filter: &PaymentFilter,
    pager: &Pager,
) -> Vec<Payment> {
    payments
        .iter()
        .filter(|payment| filter.matches(payment))
        .skip(pager.offset())
        .take(pager.limit())
        .cloned()
        .collect()
}
