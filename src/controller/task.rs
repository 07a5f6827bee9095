//! Task-specific lifecycle: recurrence routing on completion, the focus
//! reference, the subtask engine entry points, and breakdown enrichment.

use crate::controller::{Collection, ControllerEvent};
use crate::enrich::Breaker;
use crate::error::{Error, Result};
use crate::model::{EntityId, Importance, Subtask, Task};
use crate::recur::{next_occurrence, Recurrence};
use crate::sort::sort_tasks;
use crate::store::Store;
use crate::subtask::{self, DropSide};
use chrono::{Local, NaiveDate};
use std::sync::{Arc, Mutex as StdMutex};
use tracing::error;

/// Orchestrates every task mutation against the collection.
pub struct TaskController {
    tasks: Collection<Task>,
    breaker: Arc<dyn Breaker>,
    focus: StdMutex<Option<EntityId>>,
}

impl TaskController {
    /// Awaits the initial load of the task namespace.
    pub async fn load(store: Arc<dyn Store<Task>>, breaker: Arc<dyn Breaker>) -> Result<Self> {
        let tasks = Collection::load(store, Some(sort_tasks)).await?;
        Ok(Self {
            tasks,
            breaker,
            focus: StdMutex::new(None),
        })
    }

    /// The underlying collection, for snapshots and event subscription.
    pub fn tasks(&self) -> &Collection<Task> {
        &self.tasks
    }

    pub async fn create(
        &self,
        text: impl Into<String>,
        due_date: Option<NaiveDate>,
        importance: Option<Importance>,
        recurring: Option<Recurrence>,
    ) -> Result<Task> {
        let mut task = Task::new(self.tasks.next_id(), text)?;
        task.due_date = due_date;
        task.importance = importance;
        task.recurring = recurring;
        self.tasks.create(task).await
    }

    /// Replaces a task wholesale (an edit). Text is re-validated.
    pub async fn update(&self, task: Task) -> Result<Task> {
        if task.text.trim().is_empty() {
            return Err(Error::validation("task text must not be empty"));
        }
        self.tasks.update(task).await
    }

    /// Completion toggle. Non-recurring tasks flip `completed`. A recurring
    /// task never becomes completed: its due date advances to the next
    /// occurrence (anchored at today when it had no due date) and every
    /// subtask is reset to incomplete. Emits `MenuClosed` either way.
    pub async fn toggle_complete(&self, id: &EntityId) -> Result<Task> {
        let mut task = self
            .tasks
            .get(id)
            .await
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if let Some(recurrence) = task.recurring {
            let anchor = task.due_date.unwrap_or_else(today);
            task.due_date = Some(next_occurrence(anchor, recurrence.frequency));
            task.completed = false;
            for subtask in &mut task.subtasks {
                subtask.completed = false;
            }
        } else {
            task.completed = !task.completed;
        }

        let updated = self.tasks.update(task).await?;
        self.tasks.emit(ControllerEvent::MenuClosed(id.clone()));
        Ok(updated)
    }

    /// Deletes a task. If it was the focused (timer-bound) task, the focus
    /// reference is cleared and `FocusCleared` emitted.
    pub async fn delete(&self, id: &EntityId) -> Result<Task> {
        let removed = self.tasks.delete(id).await?;
        let mut focus = self.focus.lock().expect("focus lock poisoned");
        if focus.as_ref() == Some(id) {
            *focus = None;
            self.tasks.emit(ControllerEvent::FocusCleared(id.clone()));
        }
        Ok(removed)
    }

    /// Marks a task as the one bound to the countdown timer.
    pub async fn set_focus(&self, id: &EntityId) -> Result<()> {
        if self.tasks.get(id).await.is_none() {
            return Err(Error::NotFound(id.to_string()));
        }
        *self.focus.lock().expect("focus lock poisoned") = Some(id.clone());
        Ok(())
    }

    pub fn focus(&self) -> Option<EntityId> {
        self.focus.lock().expect("focus lock poisoned").clone()
    }

    /// Flips one subtask and persists the parent. Deliberately skips the
    /// parent re-sort so the task list does not jump mid-interaction.
    pub async fn toggle_subtask(&self, task_id: &EntityId, subtask_id: u64) -> Result<Task> {
        let mut task = self
            .tasks
            .get(task_id)
            .await
            .ok_or_else(|| Error::NotFound(task_id.to_string()))?;
        if !subtask::toggle(&mut task.subtasks, subtask_id) {
            return Err(Error::NotFound(format!("{task_id}/{subtask_id}")));
        }
        self.tasks.update_in_place(task).await
    }

    /// Drag-and-drop reorder within one task. No-ops (self-drop, unknown
    /// source or target) return the task unchanged without persisting.
    pub async fn reorder_subtask(
        &self,
        task_id: &EntityId,
        source_id: u64,
        target_id: u64,
        side: DropSide,
    ) -> Result<Task> {
        let mut task = self
            .tasks
            .get(task_id)
            .await
            .ok_or_else(|| Error::NotFound(task_id.to_string()))?;
        if !subtask::reorder(&mut task.subtasks, source_id, target_id, side) {
            return Ok(task);
        }
        self.tasks.update_in_place(task).await
    }

    /// Best-effort enrichment: asks the text-generation collaborator to
    /// split the task into subtasks and appends them. Any failure is logged
    /// and abandoned with zero mutation; it is never retried automatically
    /// and never surfaced to the user.
    pub async fn break_down(&self, id: &EntityId) -> Result<Task> {
        let task = self
            .tasks
            .get(id)
            .await
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let lines = match self.breaker.break_down(&task.text).await {
            Ok(lines) => lines,
            Err(e) => {
                error!("breakdown of task {id} abandoned: {e}");
                return Ok(task);
            }
        };

        let mut task = task;
        let mut next_id = task.next_subtask_id();
        let additions: Vec<Subtask> = lines
            .into_iter()
            .map(|text| {
                let subtask = Subtask {
                    id: next_id,
                    text,
                    completed: false,
                };
                next_id += 1;
                subtask
            })
            .collect();
        task.subtasks.extend(additions);
        self.tasks.update(task).await
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
