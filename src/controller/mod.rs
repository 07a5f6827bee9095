//! Entity lifecycle controllers.
//!
//! A `Collection` is the optimistic in-memory mirror of one store namespace:
//! every mutation updates the mirror first, re-applies the display order,
//! and then issues the persistence write fire-and-forget through a per-id
//! single-flight queue. `TaskController` layers the task-specific behavior
//! on top: recurrence routing, the focus reference, the subtask engine and
//! the breakdown collaborator.

mod collection;
mod task;

pub use collection::{Collection, ControllerEvent, Sorter};
pub use task::TaskController;
