//! The durable store boundary.
//!
//! Persistence is a key-value store keyed by entity id and partitioned into
//! independent namespaces, one per entity kind. The store is the sole owner
//! of persisted state; the controller's in-memory collection is a cache over
//! it. There are no cross-namespace transactions.

mod json;
mod mem;

pub use json::JsonStore;
pub use mem::MemStore;

use crate::error::Result;
use crate::model::{EntityId, ListItem, Task, Transaction};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Namespace of the task collection.
pub const TASKS: &str = "tasks";
/// Namespace of the ledger collection.
pub const TRANSACTIONS: &str = "transactions";
/// Namespace of the shopping list collection.
pub const SHOPPING: &str = "shopping";

/// A persisted record with a stable id, belonging to one store namespace.
pub trait Entity:
    Clone + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    const NAMESPACE: &'static str;

    fn id(&self) -> &EntityId;
}

impl Entity for Task {
    const NAMESPACE: &'static str = TASKS;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Transaction {
    const NAMESPACE: &'static str = TRANSACTIONS;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for ListItem {
    const NAMESPACE: &'static str = SHOPPING;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// One namespace of the durable store.
#[async_trait::async_trait]
pub trait Store<T: Entity>: Send + Sync {
    /// All records in the namespace, in unspecified order.
    async fn get_all(&self) -> Result<Vec<T>>;

    /// Adds a new record. Fails with `Error::DuplicateId` if the id already
    /// exists.
    async fn insert(&self, entity: &T) -> Result<()>;

    /// Put-or-insert: succeeds whether or not the id previously existed.
    async fn upsert(&self, entity: &T) -> Result<()>;

    /// Removes the record with `id`. Deleting an unknown id is not an error.
    async fn delete(&self, id: &EntityId) -> Result<()>;

    /// Empties the namespace.
    async fn clear(&self) -> Result<()>;
}

/// Which store backend to run against.
///
/// When DAYBOOK_IN_TEST_MODE is set and non-zero in length the whole app
/// runs top-to-bottom against the in-memory store, never touching disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Disk,
    Memory,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var("DAYBOOK_IN_TEST_MODE") {
            Ok(value) if !value.is_empty() => Mode::Memory,
            _ => Mode::Disk,
        }
    }
}
