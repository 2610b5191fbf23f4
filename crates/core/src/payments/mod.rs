//! Payments module - per-month payment status and derived totals.

mod payments_model;
mod payments_service;
mod payments_traits;

pub use payments_model::{PaymentStatusEntry, PaymentStatusUpdate, PaymentTotals};
pub use payments_service::PaymentService;
pub use payments_traits::PaymentServiceTrait;
