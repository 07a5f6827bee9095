//! The generic collection controller: optimistic mutation, deterministic
//! re-sorting, fire-and-forget persistence with rollback, and per-id write
//! serialization.

use crate::error::{Error, Result};
use crate::model::{EntityId, IdGen};
use crate::store::{Entity, Store};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::warn;

/// Re-sort function applied to the mirror after key-changing mutations.
pub type Sorter<T> = fn(&mut [T]);

/// Side effects the UI boundary reacts to. Persistence failures also arrive
/// here after the in-memory rollback has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// A fire-and-forget write failed; the optimistic mutation was rolled
    /// back. A retry affordance can be offered for this id.
    WriteFailed {
        namespace: &'static str,
        id: EntityId,
    },
    /// Completion was toggled; any contextual menu open for this entity
    /// should close.
    MenuClosed(EntityId),
    /// The focused task was deleted and no task is focused anymore.
    FocusCleared(EntityId),
}

/// Hands controller events to whichever boundary has subscribed. Emitting
/// with no subscriber is a silent no-op.
#[derive(Clone, Default)]
pub(crate) struct EventSink {
    tx: Arc<StdMutex<Option<UnboundedSender<ControllerEvent>>>>,
}

impl EventSink {
    pub(crate) fn subscribe(&self) -> UnboundedReceiver<ControllerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.tx.lock().expect("event sink lock poisoned") = Some(tx);
        rx
    }

    pub(crate) fn emit(&self, event: ControllerEvent) {
        if let Some(tx) = self.tx.lock().expect("event sink lock poisoned").as_ref() {
            // A dropped receiver just means nobody is listening anymore.
            let _ = tx.send(event);
        }
    }
}

/// At most one in-flight store write per entity id.
///
/// Each id maps to the tail of its write chain; a new write awaits the
/// previous tail before touching the store, so writes for one id execute in
/// issue order. Writes for distinct ids are independent, matching the
/// store's independent namespaces.
#[derive(Clone, Default)]
struct WriteQueue {
    tails: Arc<StdMutex<HashMap<EntityId, JoinHandle<()>>>>,
}

impl WriteQueue {
    fn push<F>(&self, id: EntityId, write: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tails = self.tails.lock().expect("write queue lock poisoned");
        let prev = tails.remove(&id);
        let handle = tokio::spawn(async move {
            if let Some(prev) = prev {
                // A panicked predecessor must not wedge the chain.
                let _ = prev.await;
            }
            write.await;
        });
        tails.insert(id, handle);
    }

    /// Awaits every pending write chain. New writes pushed while draining
    /// are not waited for.
    async fn drain(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut tails = self.tails.lock().expect("write queue lock poisoned");
            tails.drain().map(|(_, handle)| handle).collect()
        };
        for handle in handles {
            let _ = handle.await;
        }
    }
}

/// The optimistic in-memory mirror of one store namespace.
///
/// All mutations follow the same discipline: validate, mutate the mirror,
/// re-sort, then queue the store write. The caller never waits for
/// persistence; a failed write rolls the mirror back to its prior state and
/// emits `WriteFailed`. Initial load is the one awaited store read.
pub struct Collection<T: Entity> {
    store: Arc<dyn Store<T>>,
    items: Arc<RwLock<Vec<T>>>,
    queue: WriteQueue,
    sorter: Option<Sorter<T>>,
    events: EventSink,
    ids: IdGen,
}

impl<T: Entity> Collection<T> {
    /// Loads the namespace from the store and sorts it. This is awaited
    /// before the collection is authoritative for display.
    pub async fn load(store: Arc<dyn Store<T>>, sorter: Option<Sorter<T>>) -> Result<Self> {
        let mut items = store.get_all().await?;
        resort(sorter, &mut items);
        Ok(Self {
            store,
            items: Arc::new(RwLock::new(items)),
            queue: WriteQueue::default(),
            sorter,
            events: EventSink::default(),
            ids: IdGen::default(),
        })
    }

    /// A fresh id for an entity about to be created in this collection.
    pub fn next_id(&self) -> EntityId {
        self.ids.next()
    }

    /// Receives controller events. Only the latest subscriber is served.
    pub fn subscribe(&self) -> UnboundedReceiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: ControllerEvent) {
        self.events.emit(event);
    }

    /// The current display order.
    pub async fn snapshot(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    pub async fn get(&self, id: &EntityId) -> Option<T> {
        self.items.read().await.iter().find(|e| e.id() == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Inserts a freshly constructed entity and queues the store insert. The
    /// optimistic insert is rolled back if the store rejects the write.
    pub async fn create(&self, entity: T) -> Result<T> {
        {
            let mut items = self.items.write().await;
            if items.iter().any(|e| e.id() == entity.id()) {
                return Err(Error::DuplicateId {
                    namespace: T::NAMESPACE,
                    id: entity.id().as_str().to_string(),
                });
            }
            items.insert(0, entity.clone());
            resort(self.sorter, &mut items);
        }

        let store = Arc::clone(&self.store);
        let items = Arc::clone(&self.items);
        let events = self.events.clone();
        let sorter = self.sorter;
        let id = entity.id().clone();
        let written = entity.clone();
        self.queue.push(id.clone(), async move {
            if let Err(e) = store.insert(&written).await {
                warn!("rolling back create of {}/{id}: {e}", T::NAMESPACE);
                let mut items = items.write().await;
                items.retain(|x| x.id() != &id);
                resort(sorter, &mut items);
                events.emit(ControllerEvent::WriteFailed {
                    namespace: T::NAMESPACE,
                    id,
                });
            }
        });
        Ok(entity)
    }

    /// Replaces the entity with the same id, re-sorts, and queues an upsert.
    pub async fn update(&self, entity: T) -> Result<T> {
        self.replace(entity, true).await
    }

    /// Replaces without re-sorting the mirror. Used for subtask mutations,
    /// which must not make the parent list jump.
    pub(crate) async fn update_in_place(&self, entity: T) -> Result<T> {
        self.replace(entity, false).await
    }

    async fn replace(&self, entity: T, reorder: bool) -> Result<T> {
        let prev = {
            let mut items = self.items.write().await;
            let Some(pos) = items.iter().position(|e| e.id() == entity.id()) else {
                return Err(Error::NotFound(entity.id().to_string()));
            };
            let prev = std::mem::replace(&mut items[pos], entity.clone());
            if reorder {
                resort(self.sorter, &mut items);
            }
            prev
        };

        let store = Arc::clone(&self.store);
        let items = Arc::clone(&self.items);
        let events = self.events.clone();
        let sorter = self.sorter;
        let id = entity.id().clone();
        let written = entity.clone();
        self.queue.push(id.clone(), async move {
            if let Err(e) = store.upsert(&written).await {
                warn!("rolling back update of {}/{id}: {e}", T::NAMESPACE);
                let mut items = items.write().await;
                // Restore only if no later optimistic write superseded this
                // one; per-id writes are serialized, so a mismatch means a
                // newer state is already in the mirror.
                if let Some(pos) = items.iter().position(|x| x.id() == &id) {
                    if items[pos] == written {
                        items[pos] = prev;
                        resort(sorter, &mut items);
                    }
                }
                events.emit(ControllerEvent::WriteFailed {
                    namespace: T::NAMESPACE,
                    id,
                });
            }
        });
        Ok(entity)
    }

    /// Removes the entity immediately and queues the store delete. Because
    /// the delete enters the same per-id queue as earlier writes, it can
    /// never be overtaken by an in-flight update resurrecting the record.
    pub async fn delete(&self, id: &EntityId) -> Result<T> {
        let removed = {
            let mut items = self.items.write().await;
            let Some(pos) = items.iter().position(|e| e.id() == id) else {
                return Err(Error::NotFound(id.to_string()));
            };
            items.remove(pos)
        };

        let store = Arc::clone(&self.store);
        let items = Arc::clone(&self.items);
        let events = self.events.clone();
        let sorter = self.sorter;
        let id = id.clone();
        let restore = removed.clone();
        self.queue.push(id.clone(), async move {
            if let Err(e) = store.delete(&id).await {
                warn!("rolling back delete of {}/{id}: {e}", T::NAMESPACE);
                let mut items = items.write().await;
                if !items.iter().any(|x| x.id() == &id) {
                    items.push(restore);
                    resort(sorter, &mut items);
                }
                events.emit(ControllerEvent::WriteFailed {
                    namespace: T::NAMESPACE,
                    id,
                });
            }
        });
        Ok(removed)
    }

    /// Empties the collection and the namespace. This is a rare bulk
    /// operation, so unlike the per-entity mutations it settles the write
    /// queue first and awaits the store.
    pub async fn clear(&self) -> Result<()> {
        self.queue.drain().await;
        let prior = {
            let mut items = self.items.write().await;
            std::mem::take(&mut *items)
        };
        if let Err(e) = self.store.clear().await {
            let mut items = self.items.write().await;
            *items = prior;
            resort(self.sorter, &mut items);
            return Err(e);
        }
        Ok(())
    }

    /// Awaits all pending fire-and-forget writes. Call before process exit;
    /// tests use it to observe post-write state.
    pub async fn flush(&self) {
        self.queue.drain().await;
    }
}

fn resort<T: Entity>(sorter: Option<Sorter<T>>, items: &mut [T]) {
    if let Some(sort) = sorter {
        sort(items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListItem, Task, Transaction};
    use crate::sort::{sort_tasks, sort_transactions};
    use crate::store::MemStore;

    async fn task_collection(store: Arc<MemStore<Task>>) -> Collection<Task> {
        Collection::load(store, Some(sort_tasks)).await.unwrap()
    }

    fn new_task(col: &Collection<Task>, text: &str) -> Task {
        Task::new(col.next_id(), text).unwrap()
    }

    #[tokio::test]
    async fn create_persists_and_sorts() {
        let store = Arc::new(MemStore::new());
        let col = task_collection(Arc::clone(&store)).await;

        let a = col.create(new_task(&col, "first")).await.unwrap();
        let b = col.create(new_task(&col, "second")).await.unwrap();
        col.flush().await;

        // Newest first for same-state tasks.
        let snapshot = col.snapshot().await;
        assert_eq!(snapshot[0].id, b.id);
        assert_eq!(snapshot[1].id, a.id);
        assert_eq!(store.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_insert_rolls_back_the_optimistic_create() {
        let store = Arc::new(MemStore::new());
        let col = task_collection(Arc::clone(&store)).await;
        let mut events = col.subscribe();

        store.fail_next_writes(1);
        let t = col.create(new_task(&col, "doomed")).await.unwrap();
        col.flush().await;

        assert!(col.get(&t.id).await.is_none());
        assert!(store.get_all().await.unwrap().is_empty());
        assert!(matches!(
            events.try_recv(),
            Ok(ControllerEvent::WriteFailed { .. })
        ));
    }

    #[tokio::test]
    async fn failed_update_restores_the_previous_state() {
        let store = Arc::new(MemStore::new());
        let col = task_collection(Arc::clone(&store)).await;

        let t = col.create(new_task(&col, "original")).await.unwrap();
        col.flush().await;

        store.fail_next_writes(1);
        let mut edited = t.clone();
        edited.text = "edited".into();
        col.update(edited).await.unwrap();
        col.flush().await;

        assert_eq!(col.get(&t.id).await.unwrap().text, "original");
        assert_eq!(store.get_all().await.unwrap()[0].text, "original");
    }

    #[tokio::test]
    async fn failed_delete_reinserts_the_entity() {
        let store = Arc::new(MemStore::new());
        let col = task_collection(Arc::clone(&store)).await;

        let t = col.create(new_task(&col, "sticky")).await.unwrap();
        col.flush().await;

        store.fail_next_writes(1);
        col.delete(&t.id).await.unwrap();
        col.flush().await;

        assert!(col.get(&t.id).await.is_some());
    }

    #[tokio::test]
    async fn duplicate_id_create_is_rejected_before_mutation() {
        let store = Arc::new(MemStore::new());
        let col = task_collection(store).await;

        let t = col.create(new_task(&col, "one")).await.unwrap();
        let dup = Task::new(t.id.clone(), "two").unwrap();
        assert!(matches!(
            col.create(dup).await,
            Err(Error::DuplicateId { .. })
        ));
        assert_eq!(col.len().await, 1);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let store = Arc::new(MemStore::new());
        let col = task_collection(store).await;
        let ghost = Task::new(EntityId::from("0000000000000404"), "ghost").unwrap();
        assert!(matches!(col.update(ghost).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn back_to_back_writes_for_one_id_apply_in_issue_order() {
        let store = Arc::new(MemStore::new());
        let col = task_collection(Arc::clone(&store)).await;

        let t = col.create(new_task(&col, "v0")).await.unwrap();
        for version in 1..=20 {
            let mut next = col.get(&t.id).await.unwrap();
            next.text = format!("v{version}");
            col.update(next).await.unwrap();
        }
        col.flush().await;

        assert_eq!(store.get_all().await.unwrap()[0].text, "v20");
        assert_eq!(col.get(&t.id).await.unwrap().text, "v20");
    }

    #[tokio::test]
    async fn delete_queued_behind_update_cannot_resurrect_the_record() {
        let store = Arc::new(MemStore::new());
        let col = task_collection(Arc::clone(&store)).await;

        let t = col.create(new_task(&col, "v0")).await.unwrap();
        let mut edited = t.clone();
        edited.text = "v1".into();
        col.update(edited).await.unwrap();
        col.delete(&t.id).await.unwrap();
        col.flush().await;

        assert!(store.get_all().await.unwrap().is_empty());
        assert!(col.get(&t.id).await.is_none());
    }

    #[tokio::test]
    async fn clear_empties_mirror_and_store() {
        let store = Arc::new(MemStore::new());
        let col: Collection<ListItem> = Collection::load(store.clone(), None).await.unwrap();
        col.create(ListItem::new(col.next_id(), "eggs").unwrap())
            .await
            .unwrap();
        col.clear().await.unwrap();
        assert!(col.is_empty().await);
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn transactions_load_sorted_by_date_descending() {
        let store: Arc<MemStore<Transaction>> = Arc::new(MemStore::new());
        let col = Collection::load(store.clone(), Some(sort_transactions as Sorter<Transaction>))
            .await
            .unwrap();
        use crate::model::{Amount, Category};
        use rust_decimal::Decimal;
        let mk = |id: &str, date: &str| Transaction {
            id: EntityId::from(id),
            description: "x".into(),
            amount: Amount::new(-Decimal::ONE),
            date: date.parse().unwrap(),
            category: Category::Other,
            recurring: None,
        };
        col.create(mk("0000000000000001", "2024-01-01")).await.unwrap();
        col.create(mk("0000000000000002", "2024-02-01")).await.unwrap();
        col.create(mk("0000000000000003", "2024-01-15")).await.unwrap();
        let dates: Vec<String> = col
            .snapshot()
            .await
            .iter()
            .map(|t| t.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-02-01", "2024-01-15", "2024-01-01"]);
    }
}
