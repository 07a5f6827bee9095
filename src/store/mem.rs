//! Implements the `Store` trait with in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so
//! that the whole app can run, top-to-bottom, without touching the
//! filesystem (see `Mode::from_env`).

use crate::error::{Error, Result};
use crate::model::EntityId;
use crate::store::{Entity, Store};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// An in-memory implementation of the `Store` trait.
///
/// `fail_next_writes` injects failures into upcoming write operations, which
/// is how the controller's rollback path is exercised.
#[derive(Default)]
pub struct MemStore<T: Entity> {
    data: Mutex<BTreeMap<String, T>>,
    fail_writes: AtomicU32,
}

impl<T: Entity> MemStore<T> {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(BTreeMap::new()),
            fail_writes: AtomicU32::new(0),
        }
    }

    /// Makes the next `count` write operations fail with a persistence
    /// error.
    pub fn fail_next_writes(&self, count: u32) {
        self.fail_writes.store(count, Ordering::SeqCst);
    }

    fn check_injected_failure(&self) -> Result<()> {
        let remaining = self.fail_writes.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_writes.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::persistence(T::NAMESPACE, "injected write failure"));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, T>> {
        self.data.lock().expect("store data lock poisoned")
    }
}

#[async_trait::async_trait]
impl<T: Entity> Store<T> for MemStore<T> {
    async fn get_all(&self) -> Result<Vec<T>> {
        Ok(self.lock().values().cloned().collect())
    }

    async fn insert(&self, entity: &T) -> Result<()> {
        self.check_injected_failure()?;
        let mut data = self.lock();
        let key = entity.id().as_str().to_string();
        if data.contains_key(&key) {
            return Err(Error::DuplicateId {
                namespace: T::NAMESPACE,
                id: key,
            });
        }
        data.insert(key, entity.clone());
        Ok(())
    }

    async fn upsert(&self, entity: &T) -> Result<()> {
        self.check_injected_failure()?;
        self.lock()
            .insert(entity.id().as_str().to_string(), entity.clone());
        Ok(())
    }

    async fn delete(&self, id: &EntityId) -> Result<()> {
        self.check_injected_failure()?;
        self.lock().remove(id.as_str());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.check_injected_failure()?;
        self.lock().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityId, ListItem};

    fn item(id: &str) -> ListItem {
        ListItem::new(EntityId::from(id), "eggs").unwrap()
    }

    #[tokio::test]
    async fn basic_crud() {
        let store: MemStore<ListItem> = MemStore::new();
        store.insert(&item("0000000000000001")).await.unwrap();
        assert!(matches!(
            store.insert(&item("0000000000000001")).await,
            Err(Error::DuplicateId { .. })
        ));
        store.upsert(&item("0000000000000002")).await.unwrap();
        assert_eq!(store.get_all().await.unwrap().len(), 2);
        store.delete(&EntityId::from("0000000000000001")).await.unwrap();
        assert_eq!(store.get_all().await.unwrap().len(), 1);
        store.clear().await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn injected_failures_consume_themselves() {
        let store: MemStore<ListItem> = MemStore::new();
        store.fail_next_writes(1);
        assert!(store.insert(&item("0000000000000001")).await.is_err());
        store.insert(&item("0000000000000001")).await.unwrap();
    }
}
