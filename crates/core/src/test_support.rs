//! In-memory `EntityStore` used by unit tests across the crate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::{Error, Result};
use crate::storage::{EntityStore, StoredEntity};

pub(crate) struct MemoryStore<E> {
    items: Mutex<Vec<E>>,
    next_id: AtomicUsize,
}

impl<E> MemoryStore<E> {
    pub(crate) fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        }
    }
}

#[async_trait]
impl<E: StoredEntity> EntityStore<E> for MemoryStore<E> {
    async fn list(&self) -> Result<Vec<E>> {
        Ok(self.items.lock().unwrap().clone())
    }

    async fn get(&self, id: &str) -> Result<E> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{} '{id}'", E::COLLECTION)))
    }

    async fn save(&self, mut entity: E) -> Result<E> {
        let mut items = self.items.lock().unwrap();
        if entity.id().is_empty() {
            let id = format!("mem-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
            entity.set_id(id);
            items.push(entity.clone());
        } else {
            let position = items
                .iter()
                .position(|item| item.id() == entity.id())
                .ok_or_else(|| Error::NotFound(format!("{} '{}'", E::COLLECTION, entity.id())))?;
            items[position] = entity.clone();
        }
        Ok(entity)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        let position = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| Error::NotFound(format!("{} '{id}'", E::COLLECTION)))?;
        items.remove(position);
        Ok(())
    }
}
