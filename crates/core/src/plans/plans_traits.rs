use crate::errors::Result;
use crate::plans::plans_model::{NewPlan, Plan, PlanUpdate};
use async_trait::async_trait;

/// Trait for plan service operations
#[async_trait]
pub trait PlanServiceTrait: Send + Sync {
    async fn get_plans(&self) -> Result<Vec<Plan>>;
    async fn get_plan(&self, plan_id: &str) -> Result<Plan>;
    async fn create_plan(&self, new_plan: NewPlan) -> Result<Plan>;
    async fn update_plan(&self, plan_id: &str, update: PlanUpdate) -> Result<Plan>;
    async fn delete_plan(&self, plan_id: &str) -> Result<()>;

    /// Upsert the identified entries and insert the rest, returning one
    /// persisted plan per input entry in input order.
    async fn bulk_import(&self, plans: Vec<NewPlan>) -> Result<Vec<Plan>>;
}
