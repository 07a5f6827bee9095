//! Types that represent the core data model: `Task`, `Transaction` and
//! `ListItem`, plus the id and currency primitives they share.

mod amount;
mod id;
mod list_item;
mod task;
mod transaction;

pub use amount::Amount;
pub use id::{EntityId, IdGen};
pub use list_item::ListItem;
pub use task::{Importance, Subtask, Task};
pub use transaction::{Category, Direction, Transaction};
