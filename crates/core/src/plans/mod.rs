//! Plans module - domain models, services, and traits.

mod plans_model;
mod plans_service;
mod plans_traits;

pub use plans_model::{DebtOwner, NewPlan, Plan, PlanUpdate};
pub use plans_service::PlanService;
pub use plans_traits::PlanServiceTrait;
