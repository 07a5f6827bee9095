//! File-backed store: one pretty-printed JSON file per namespace.

use crate::error::{Error, Result};
use crate::model::EntityId;
use crate::store::{Entity, Store};
use crate::utils;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::trace;

/// Stores one namespace as `<data_dir>/<namespace>.json`, a map from id to
/// record. The map is keyed so files diff cleanly and reads are stable.
///
/// A file-level mutex guards every read-modify-write cycle; together with
/// the controller's per-id write queue this keeps the file consistent
/// without any cross-process locking (the app is single-process by design).
pub struct JsonStore<T: Entity> {
    path: PathBuf,
    lock: Mutex<()>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> JsonStore<T> {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{}.json", T::NAMESPACE)),
            lock: Mutex::new(()),
            _entity: PhantomData,
        }
    }

    async fn load_map(&self) -> Result<BTreeMap<String, T>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        utils::deserialize(&self.path)
            .await
            .map_err(|e| Error::persistence(T::NAMESPACE, e.to_string()))
    }

    async fn save_map(&self, map: &BTreeMap<String, T>) -> Result<()> {
        utils::serialize(&self.path, map)
            .await
            .map_err(|e| Error::persistence(T::NAMESPACE, e.to_string()))
    }
}

#[async_trait::async_trait]
impl<T: Entity> Store<T> for JsonStore<T> {
    async fn get_all(&self) -> Result<Vec<T>> {
        let _guard = self.lock.lock().await;
        let map = self.load_map().await?;
        Ok(map.into_values().collect())
    }

    async fn insert(&self, entity: &T) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.load_map().await?;
        let key = entity.id().as_str().to_string();
        if map.contains_key(&key) {
            return Err(Error::DuplicateId {
                namespace: T::NAMESPACE,
                id: key,
            });
        }
        trace!("insert {}/{key}", T::NAMESPACE);
        map.insert(key, entity.clone());
        self.save_map(&map).await
    }

    async fn upsert(&self, entity: &T) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.load_map().await?;
        trace!("upsert {}/{}", T::NAMESPACE, entity.id());
        map.insert(entity.id().as_str().to_string(), entity.clone());
        self.save_map(&map).await
    }

    async fn delete(&self, id: &EntityId) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.load_map().await?;
        trace!("delete {}/{id}", T::NAMESPACE);
        map.remove(id.as_str());
        self.save_map(&map).await
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.save_map(&BTreeMap::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityId, Task};
    use tempfile::TempDir;

    fn task(id: &str, text: &str) -> Task {
        Task::new(EntityId::from(id), text).unwrap()
    }

    #[tokio::test]
    async fn round_trips_records() {
        let dir = TempDir::new().unwrap();
        let store: JsonStore<Task> = JsonStore::new(dir.path());

        store.insert(&task("0000000000000001", "one")).await.unwrap();
        store.insert(&task("0000000000000002", "two")).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn get_all_on_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store: JsonStore<Task> = JsonStore::new(dir.path());
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_ids() {
        let dir = TempDir::new().unwrap();
        let store: JsonStore<Task> = JsonStore::new(dir.path());

        store.insert(&task("0000000000000001", "one")).await.unwrap();
        let result = store.insert(&task("0000000000000001", "again")).await;
        assert!(matches!(result, Err(Error::DuplicateId { .. })));
    }

    #[tokio::test]
    async fn upsert_replaces_and_delete_removes() {
        let dir = TempDir::new().unwrap();
        let store: JsonStore<Task> = JsonStore::new(dir.path());

        let mut t = task("0000000000000001", "before");
        store.insert(&t).await.unwrap();
        t.text = "after".into();
        store.upsert(&t).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all[0].text, "after");

        store.delete(&EntityId::from("0000000000000001")).await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());

        // Deleting an unknown id is not an error.
        store.delete(&EntityId::from("0000000000000009")).await.unwrap();
    }

    #[tokio::test]
    async fn clear_empties_the_namespace() {
        let dir = TempDir::new().unwrap();
        let store: JsonStore<Task> = JsonStore::new(dir.path());
        store.insert(&task("0000000000000001", "one")).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
    }
}
