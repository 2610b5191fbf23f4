//! Payment status domain models and their canonical validators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::storage::StoredEntity;

/// One month's payment record within a plan. Month indices are
/// zero-based and unique per plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusEntry {
    #[serde(default)]
    pub id: String,
    pub plan_id: String,
    pub month_index: u32,
    /// Free-text label, e.g. "paid", "pending", "skipped".
    pub status: String,
    pub amount: f64,
    /// `None` means the month is unpaid.
    pub paid_at: Option<DateTime<Utc>>,
}

impl StoredEntity for PaymentStatusEntry {
    const COLLECTION: &'static str = "payment_status";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// One entry of a payment-status update payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusUpdate {
    pub month_index: u32,
    pub status: String,
    pub amount: f64,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl PaymentStatusUpdate {
    /// Validate a whole update batch all-or-nothing, including month
    /// index uniqueness across the batch.
    pub fn validate_batch(entries: &[PaymentStatusUpdate]) -> Result<(), ValidationError> {
        let mut err = ValidationError::new();
        let mut seen_months = std::collections::HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            if entry.status.trim().is_empty() {
                err.add(format!("entries[{index}].status"), "is required");
            }
            if !entry.amount.is_finite() || entry.amount <= 0.0 {
                err.add(
                    format!("entries[{index}].amount"),
                    "must be greater than zero",
                );
            }
            if !seen_months.insert(entry.month_index) {
                err.add(
                    format!("entries[{index}].monthIndex"),
                    "duplicates another entry's month",
                );
            }
        }
        err.into_result()
    }

    pub fn into_entry(self, plan_id: &str, id: String) -> PaymentStatusEntry {
        PaymentStatusEntry {
            id,
            plan_id: plan_id.to_string(),
            month_index: self.month_index,
            status: self.status,
            amount: self.amount,
            paid_at: self.paid_at,
        }
    }
}

/// Derived aggregate over a plan's entries. Recomputed on demand, never
/// an independent source of truth.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTotals {
    pub total_paid: f64,
    pub remaining: f64,
}

impl PaymentTotals {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut err = ValidationError::new();
        if !self.total_paid.is_finite() || self.total_paid < 0.0 {
            err.add("totalPaid", "must be zero or greater");
        }
        if !self.remaining.is_finite() || self.remaining < 0.0 {
            err.add("remaining", "must be zero or greater");
        }
        err.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(month_index: u32, amount: f64) -> PaymentStatusUpdate {
        PaymentStatusUpdate {
            month_index,
            status: "paid".to_string(),
            amount,
            paid_at: None,
        }
    }

    #[test]
    fn accepts_well_formed_batch() {
        assert!(PaymentStatusUpdate::validate_batch(&[entry(0, 100.0), entry(1, 100.0)]).is_ok());
    }

    #[test]
    fn rejects_duplicate_month_index() {
        let err =
            PaymentStatusUpdate::validate_batch(&[entry(3, 100.0), entry(3, 50.0)]).unwrap_err();
        assert_eq!(err.violations[0].field, "entries[1].monthIndex");
    }

    #[test]
    fn rejects_non_positive_amount_and_blank_status() {
        let mut bad = entry(0, 0.0);
        bad.status = "".to_string();
        let err = PaymentStatusUpdate::validate_batch(&[bad]).unwrap_err();
        assert_eq!(err.violations.len(), 2);
    }

    #[test]
    fn totals_reject_negative_fields() {
        let totals = PaymentTotals {
            total_paid: -1.0,
            remaining: 10.0,
        };
        let err = totals.validate().unwrap_err();
        assert_eq!(err.violations[0].field, "totalPaid");
    }

    #[test]
    fn totals_accept_zero_zero() {
        let totals = PaymentTotals {
            total_paid: 0.0,
            remaining: 0.0,
        };
        assert!(totals.validate().is_ok());
    }
}
