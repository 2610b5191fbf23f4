//! Debtfolio Storage - interchangeable storage backends.
//!
//! Three backends conforming to `debtfolio_core::storage::EntityStore`:
//! local single-file JSON persistence, a remote API client, and a hosted
//! backend-as-a-service client. [`build_store`] selects one from the
//! storage settings. For one logical sequence of operations all three
//! produce the same success/failure outcomes; only latency and the
//! origin of `StorageUnavailable` failures differ.

mod api;
mod factory;
mod hosted;
mod local;

pub use api::ApiStore;
pub use factory::build_store;
pub use hosted::HostedStore;
pub use local::LocalStore;
