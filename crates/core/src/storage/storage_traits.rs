use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::Result;

/// Contract for entities persisted through an [`EntityStore`].
///
/// The identifier is a plain string, empty until the entity has been
/// persisted for the first time.
pub trait StoredEntity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Fixed namespace key for the entity's collection. The local backend
    /// uses it as the collection key in its persistence area; the remote
    /// backends use it as the resource segment.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);
}

/// Capability contract every storage backend must satisfy.
///
/// All three backends (local, remote API, hosted service) produce
/// identical externally observable behavior for the same logical
/// sequence of operations, differing only in latency and failure-mode
/// origin. Any operation may fail with `StorageUnavailable` independent
/// of entity-level errors; retrying is a caller concern.
#[async_trait]
pub trait EntityStore<E: StoredEntity>: Send + Sync {
    /// All entities visible to the current scope. Never partial: an
    /// unreachable backend fails the whole call.
    async fn list(&self) -> Result<Vec<E>>;

    /// Fails with `NotFound` when no entity has the identifier.
    async fn get(&self, id: &str) -> Result<E>;

    /// Empty identifier: assign a fresh one and insert. Non-empty
    /// identifier: overwrite the existing entity, or fail with
    /// `NotFound` when it does not exist. Returns the persisted entity
    /// with its identifier populated.
    async fn save(&self, entity: E) -> Result<E>;

    /// Not idempotent: deleting an absent identifier fails with
    /// `NotFound`, including a second delete of the same identifier.
    async fn delete(&self, id: &str) -> Result<()>;
}

impl<E: StoredEntity> std::fmt::Debug for dyn EntityStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EntityStore")
    }
}
