use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use crate::errors::Result;
use crate::payments::PaymentStatusEntry;
use crate::plans::plans_model::{NewPlan, Plan, PlanUpdate};
use crate::plans::plans_traits::PlanServiceTrait;
use crate::storage::EntityStore;

pub struct PlanService {
    plan_store: Arc<dyn EntityStore<Plan>>,
    payment_store: Arc<dyn EntityStore<PaymentStatusEntry>>,
}

impl PlanService {
    pub fn new(
        plan_store: Arc<dyn EntityStore<Plan>>,
        payment_store: Arc<dyn EntityStore<PaymentStatusEntry>>,
    ) -> Self {
        Self {
            plan_store,
            payment_store,
        }
    }

    /// Persist one creation-shaped entry. An entry carrying an
    /// identifier updates the existing plan (keeping its creation
    /// timestamp); an entry without one is inserted with a fresh id.
    async fn upsert(&self, new_plan: NewPlan) -> Result<Plan> {
        let now = Utc::now();
        let mut plan = new_plan.into_plan(now);
        if !plan.id.is_empty() {
            let existing = self.plan_store.get(&plan.id).await?;
            plan.created_at = existing.created_at;
        }
        self.plan_store.save(plan).await
    }
}

#[async_trait]
impl PlanServiceTrait for PlanService {
    async fn get_plans(&self) -> Result<Vec<Plan>> {
        self.plan_store.list().await
    }

    async fn get_plan(&self, plan_id: &str) -> Result<Plan> {
        self.plan_store.get(plan_id).await
    }

    async fn create_plan(&self, new_plan: NewPlan) -> Result<Plan> {
        new_plan.validate()?;
        self.upsert(new_plan).await
    }

    async fn update_plan(&self, plan_id: &str, update: PlanUpdate) -> Result<Plan> {
        update.validate()?;
        let mut plan = self.plan_store.get(plan_id).await?;
        update.apply_to(&mut plan, Utc::now());
        self.plan_store.save(plan).await
    }

    async fn delete_plan(&self, plan_id: &str) -> Result<()> {
        self.plan_store.delete(plan_id).await?;

        // Payment entries belong to exactly one plan; drop them with it.
        let entries = self.payment_store.list().await?;
        for entry in entries.into_iter().filter(|e| e.plan_id == plan_id) {
            self.payment_store.delete(&entry.id).await?;
        }
        Ok(())
    }

    async fn bulk_import(&self, plans: Vec<NewPlan>) -> Result<Vec<Plan>> {
        NewPlan::validate_batch(&plans)?;
        debug!("Importing {} plans", plans.len());

        let mut persisted = Vec::with_capacity(plans.len());
        for new_plan in plans {
            persisted.push(self.upsert(new_plan).await?);
        }
        Ok(persisted)
    }
}
