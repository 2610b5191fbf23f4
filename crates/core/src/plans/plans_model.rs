//! Plan domain models and their canonical validators.
//!
//! This is the single source of truth for plan payload constraints;
//! every boundary (HTTP handlers, bulk import) validates through here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ValidationError;
use crate::storage::StoredEntity;

/// Who carries the debt tracked by a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DebtOwner {
    #[default]
    #[serde(rename = "self")]
    SelfOwned,
    #[serde(rename = "other")]
    Other,
}

/// Domain model representing a debt payment plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub total_amount: f64,
    /// `None` means the schedule length has not been determined yet.
    pub number_of_months: Option<u32>,
    pub monthly_payment: f64,
    #[serde(default)]
    pub debt_owner: DebtOwner,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl StoredEntity for Plan {
    const COLLECTION: &'static str = "plans";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Input model for creating a plan. The optional identifier carries
/// upsert semantics in bulk imports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub total_amount: f64,
    #[serde(default)]
    pub number_of_months: Option<u32>,
    pub monthly_payment: f64,
    #[serde(default)]
    pub debt_owner: DebtOwner,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl NewPlan {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut err = ValidationError::new();
        self.validate_into(&mut err, "");
        err.into_result()
    }

    /// Validate with a field-path prefix, so batch entries report as
    /// e.g. `plans[2].totalAmount`.
    fn validate_into(&self, err: &mut ValidationError, prefix: &str) {
        if self.name.trim().is_empty() {
            err.add(format!("{prefix}name"), "is required");
        }
        check_positive_amount(err, &format!("{prefix}totalAmount"), self.total_amount);
        check_positive_amount(err, &format!("{prefix}monthlyPayment"), self.monthly_payment);
        if self.number_of_months == Some(0) {
            err.add(
                format!("{prefix}numberOfMonths"),
                "must be a positive integer or null",
            );
        }
    }

    /// Validate a bulk import batch all-or-nothing: any violation in any
    /// entry rejects the whole batch.
    pub fn validate_batch(plans: &[NewPlan]) -> Result<(), ValidationError> {
        let mut err = ValidationError::new();
        for (index, plan) in plans.iter().enumerate() {
            plan.validate_into(&mut err, &format!("plans[{index}]."));
        }
        err.into_result()
    }

    /// Build the entity to persist; timestamps are stamped here, the
    /// identifier is left to the storage backend when absent.
    pub fn into_plan(self, now: DateTime<Utc>) -> Plan {
        Plan {
            id: self.id.unwrap_or_default(),
            name: self.name,
            total_amount: self.total_amount,
            number_of_months: self.number_of_months,
            monthly_payment: self.monthly_payment,
            debt_owner: self.debt_owner,
            is_active: self.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a plan. Every field is optional; per-field
/// constraints match creation when a field is present. `numberOfMonths`
/// distinguishes "absent" from an explicit null (clear the schedule).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default, deserialize_with = "some_nullable")]
    pub number_of_months: Option<Option<u32>>,
    #[serde(default)]
    pub monthly_payment: Option<f64>,
    #[serde(default)]
    pub debt_owner: Option<DebtOwner>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Present-but-null deserializes to `Some(None)`; an absent field stays
/// `None` via the `default` attribute.
fn some_nullable<'de, D>(deserializer: D) -> Result<Option<Option<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u32>::deserialize(deserializer).map(Some)
}

impl PlanUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut err = ValidationError::new();
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                err.add("name", "is required");
            }
        }
        if let Some(amount) = self.total_amount {
            check_positive_amount(&mut err, "totalAmount", amount);
        }
        if let Some(payment) = self.monthly_payment {
            check_positive_amount(&mut err, "monthlyPayment", payment);
        }
        if self.number_of_months == Some(Some(0)) {
            err.add("numberOfMonths", "must be a positive integer or null");
        }
        err.into_result()
    }

    /// Merge the present fields onto an existing plan.
    pub fn apply_to(self, plan: &mut Plan, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            plan.name = name;
        }
        if let Some(amount) = self.total_amount {
            plan.total_amount = amount;
        }
        if let Some(months) = self.number_of_months {
            plan.number_of_months = months;
        }
        if let Some(payment) = self.monthly_payment {
            plan.monthly_payment = payment;
        }
        if let Some(owner) = self.debt_owner {
            plan.debt_owner = owner;
        }
        if let Some(active) = self.is_active {
            plan.is_active = active;
        }
        plan.updated_at = now;
    }
}

fn check_positive_amount(err: &mut ValidationError, field: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        err.add(field, "must be greater than zero");
    }
}
