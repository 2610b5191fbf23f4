use crate::errors::Result;
use crate::payments::payments_model::{PaymentStatusEntry, PaymentStatusUpdate, PaymentTotals};
use async_trait::async_trait;

/// Trait for payment status service operations
#[async_trait]
pub trait PaymentServiceTrait: Send + Sync {
    /// A plan's entries, ordered by month index.
    async fn get_status(&self, plan_id: &str) -> Result<Vec<PaymentStatusEntry>>;

    /// Replace a plan's entries wholesale with a validated batch.
    async fn update_status(
        &self,
        plan_id: &str,
        entries: Vec<PaymentStatusUpdate>,
    ) -> Result<Vec<PaymentStatusEntry>>;

    /// Totals recomputed from the plan's entries.
    async fn get_totals(&self, plan_id: &str) -> Result<PaymentTotals>;

    /// Validate a client-supplied totals payload, then return the
    /// authoritative recomputed totals.
    async fn check_totals(&self, plan_id: &str, totals: PaymentTotals) -> Result<PaymentTotals>;
}
