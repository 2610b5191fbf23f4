//! Local storage backend.
//!
//! Persists each entity type as one serialized JSON collection under a
//! fixed namespace key (the collection file) inside a data directory.
//! Every operation is a read-modify-write of the whole collection inside
//! a single synchronous critical section; the lock is never held across
//! an await point, so two cycles on the same namespace key cannot
//! interleave within one process.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use debtfolio_core::errors::{Error, Result};
use debtfolio_core::storage::{EntityStore, StoredEntity};

pub struct LocalStore<E> {
    path: PathBuf,
    lock: Mutex<()>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: StoredEntity> LocalStore<E> {
    /// Construction builds paths only; no I/O happens until the first
    /// operation, so redundant construction is side-effect-free.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{}.json", E::COLLECTION)),
            lock: Mutex::new(()),
            _entity: PhantomData,
        }
    }

    fn load_collection_locked(&self) -> Result<Vec<E>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read(&self.path).map_err(|e| unavailable("read", &self.path, e))?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&raw).map_err(|e| {
            Error::StorageUnavailable(format!(
                "Corrupt collection file {}: {e}",
                self.path.display()
            ))
        })
    }

    fn persist_collection_locked(&self, collection: &[E]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| unavailable("create", parent, e))?;
        }
        let json = serde_json::to_vec_pretty(collection)
            .map_err(|e| Error::StorageUnavailable(format!("Failed to serialize collection: {e}")))?;
        fs::write(&self.path, json).map_err(|e| unavailable("write", &self.path, e))
    }

    /// One read-modify-write cycle under the namespace lock.
    fn with_collection<T>(&self, op: impl FnOnce(&mut Vec<E>) -> Result<T>) -> Result<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::StorageUnavailable("Local store lock poisoned".into()))?;
        let mut collection = self.load_collection_locked()?;
        let value = op(&mut collection)?;
        self.persist_collection_locked(&collection)?;
        Ok(value)
    }

    fn read_collection(&self) -> Result<Vec<E>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::StorageUnavailable("Local store lock poisoned".into()))?;
        self.load_collection_locked()
    }

    fn missing(id: &str) -> Error {
        Error::NotFound(format!("{} '{id}'", E::COLLECTION))
    }
}

fn unavailable(action: &str, path: &Path, err: std::io::Error) -> Error {
    Error::StorageUnavailable(format!("Failed to {action} {}: {err}", path.display()))
}

#[async_trait]
impl<E: StoredEntity> EntityStore<E> for LocalStore<E> {
    async fn list(&self) -> Result<Vec<E>> {
        self.read_collection()
    }

    async fn get(&self, id: &str) -> Result<E> {
        self.read_collection()?
            .into_iter()
            .find(|entity| entity.id() == id)
            .ok_or_else(|| Self::missing(id))
    }

    async fn save(&self, mut entity: E) -> Result<E> {
        self.with_collection(|collection| {
            if entity.id().is_empty() {
                entity.set_id(Uuid::new_v4().to_string());
                collection.push(entity.clone());
            } else {
                let position = collection
                    .iter()
                    .position(|existing| existing.id() == entity.id())
                    .ok_or_else(|| Self::missing(entity.id()))?;
                collection[position] = entity.clone();
            }
            Ok(entity.clone())
        })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.with_collection(|collection| {
            let position = collection
                .iter()
                .position(|existing| existing.id() == id)
                .ok_or_else(|| Self::missing(id))?;
            collection.remove(position);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use debtfolio_core::plans::{NewPlan, Plan};
    use tempfile::tempdir;

    fn store(dir: &Path) -> LocalStore<Plan> {
        LocalStore::new(dir)
    }

    fn plan(name: &str) -> Plan {
        NewPlan {
            id: None,
            name: name.to_string(),
            total_amount: 1_200.0,
            number_of_months: Some(12),
            monthly_payment: 100.0,
            debt_owner: Default::default(),
            is_active: None,
        }
        .into_plan(Utc::now())
    }

    #[tokio::test]
    async fn save_assigns_id_and_get_round_trips() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let saved = store.save(plan("Car loan")).await.unwrap();
        assert!(!saved.id.is_empty());
        assert_eq!(store.get(&saved.id).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn list_on_fresh_directory_is_empty() {
        let dir = tempdir().unwrap();
        assert!(store(dir.path()).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let mut ghost = plan("Ghost");
        ghost.id = "does-not-exist".to_string();
        assert!(matches!(
            store.save(ghost).await.unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn delete_fails_on_missing_and_on_second_delete() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        assert!(matches!(
            store.delete("missing").await.unwrap_err(),
            Error::NotFound(_)
        ));

        let saved = store.save(plan("Car loan")).await.unwrap();
        store.delete(&saved.id).await.unwrap();
        assert!(matches!(
            store.delete(&saved.id).await.unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn collection_survives_reconstruction() {
        let dir = tempdir().unwrap();
        let saved = store(dir.path()).save(plan("Car loan")).await.unwrap();

        // A fresh instance over the same directory sees the same data.
        let reopened = store(dir.path());
        let listed = reopened.list().await.unwrap();
        assert_eq!(listed, vec![saved]);
    }

    #[tokio::test]
    async fn collections_are_namespaced_per_entity_type() {
        let dir = tempdir().unwrap();
        store(dir.path()).save(plan("Car loan")).await.unwrap();
        let entries: LocalStore<debtfolio_core::payments::PaymentStatusEntry> =
            LocalStore::new(dir.path());
        assert!(entries.list().await.unwrap().is_empty());
    }
}
