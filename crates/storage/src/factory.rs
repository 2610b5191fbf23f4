//! Configuration-driven backend selection.

use std::sync::Arc;

use debtfolio_core::errors::{Error, Result};
use debtfolio_core::storage::{EntityStore, StorageMode, StorageSettings, StoredEntity};

use crate::{ApiStore, HostedStore, LocalStore};

/// Construct the storage backend selected by the settings.
///
/// A pure mapping from configuration to a fresh backend instance:
/// construction performs no I/O, so calling this more than once is
/// side-effect-free and cannot corrupt previously constructed stores.
/// A populated hosted section takes precedence over the mode value.
pub fn build_store<E: StoredEntity>(settings: &StorageSettings) -> Result<Arc<dyn EntityStore<E>>> {
    if let Some(hosted) = &settings.hosted {
        return Ok(Arc::new(HostedStore::new(&hosted.base_url, &hosted.api_key)?));
    }
    match settings.mode {
        StorageMode::Local => Ok(Arc::new(LocalStore::new(&settings.data_dir))),
        StorageMode::Api => {
            let api = settings
                .api
                .as_ref()
                .ok_or_else(|| Error::MissingConfigKey("DF_API_BASE_URL".into()))?;
            Ok(Arc::new(ApiStore::new(&api.base_url, &api.access_token)?))
        }
    }
}
