use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::errors::Result;
use crate::payments::payments_model::{PaymentStatusEntry, PaymentStatusUpdate, PaymentTotals};
use crate::payments::payments_traits::PaymentServiceTrait;
use crate::plans::Plan;
use crate::storage::EntityStore;

pub struct PaymentService {
    plan_store: Arc<dyn EntityStore<Plan>>,
    payment_store: Arc<dyn EntityStore<PaymentStatusEntry>>,
}

impl PaymentService {
    pub fn new(
        plan_store: Arc<dyn EntityStore<Plan>>,
        payment_store: Arc<dyn EntityStore<PaymentStatusEntry>>,
    ) -> Self {
        Self {
            plan_store,
            payment_store,
        }
    }

    async fn entries_for(&self, plan_id: &str) -> Result<Vec<PaymentStatusEntry>> {
        let mut entries: Vec<PaymentStatusEntry> = self
            .payment_store
            .list()
            .await?
            .into_iter()
            .filter(|entry| entry.plan_id == plan_id)
            .collect();
        entries.sort_by_key(|entry| entry.month_index);
        Ok(entries)
    }

    fn compute_totals(plan: &Plan, entries: &[PaymentStatusEntry]) -> PaymentTotals {
        let total_paid: f64 = entries
            .iter()
            .filter(|entry| entry.paid_at.is_some())
            .map(|entry| entry.amount)
            .sum();
        PaymentTotals {
            total_paid,
            remaining: (plan.total_amount - total_paid).max(0.0),
        }
    }
}

#[async_trait]
impl PaymentServiceTrait for PaymentService {
    async fn get_status(&self, plan_id: &str) -> Result<Vec<PaymentStatusEntry>> {
        self.plan_store.get(plan_id).await?;
        self.entries_for(plan_id).await
    }

    async fn update_status(
        &self,
        plan_id: &str,
        entries: Vec<PaymentStatusUpdate>,
    ) -> Result<Vec<PaymentStatusEntry>> {
        self.plan_store.get(plan_id).await?;
        PaymentStatusUpdate::validate_batch(&entries)?;

        let existing = self.entries_for(plan_id).await?;
        let mut by_month: HashMap<u32, String> = existing
            .iter()
            .map(|entry| (entry.month_index, entry.id.clone()))
            .collect();

        debug!(
            "Replacing {} payment entries with {} for plan {plan_id}",
            existing.len(),
            entries.len()
        );

        // Entries for months kept in the batch retain their ids; the
        // rest are dropped before the new months are inserted.
        let mut persisted = Vec::with_capacity(entries.len());
        for update in entries {
            let id = by_month.remove(&update.month_index).unwrap_or_default();
            persisted.push(
                self.payment_store
                    .save(update.into_entry(plan_id, id))
                    .await?,
            );
        }
        for stale_id in by_month.into_values() {
            self.payment_store.delete(&stale_id).await?;
        }

        persisted.sort_by_key(|entry| entry.month_index);
        Ok(persisted)
    }

    async fn get_totals(&self, plan_id: &str) -> Result<PaymentTotals> {
        let plan = self.plan_store.get(plan_id).await?;
        let entries = self.entries_for(plan_id).await?;
        Ok(Self::compute_totals(&plan, &entries))
    }

    async fn check_totals(&self, plan_id: &str, totals: PaymentTotals) -> Result<PaymentTotals> {
        totals.validate()?;
        self.get_totals(plan_id).await
    }
}
