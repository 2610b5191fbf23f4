//! Storage abstraction - capability contract and backend selection config.

mod storage_config;
mod storage_traits;

pub use storage_config::{ApiSettings, HostedSettings, StorageMode, StorageSettings};
pub use storage_traits::{EntityStore, StoredEntity};
