//! The Task entity: text, completion, optional due date, importance,
//! recurrence, and an ordered sub-list of subtasks.

use crate::error::{Error, Result};
use crate::model::EntityId;
use crate::recur::Recurrence;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task importance. Higher importance sorts earlier in the display order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    /// Display-order rank. High is 1; a task without an importance ranks 4.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Importance::High => 1,
            Importance::Medium => 2,
            Importance::Low => 3,
        }
    }
}

/// An independently completable step nested inside a Task. Subtask ids are
/// numeric and unique within their parent task only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Subtask {
    pub id: u64,
    pub text: String,
    pub completed: bool,
}

/// A to-do item.
///
/// A completed non-recurring task is terminal. A recurring task is never
/// truly completed: completing it advances the due date and resets subtask
/// completion (see `TaskController::toggle_complete`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    pub id: EntityId,
    pub text: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// Creates an incomplete task. Fails with a validation error if `text`
    /// is empty or whitespace.
    pub fn new(id: EntityId, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::validation("task text must not be empty"));
        }
        Ok(Task {
            id,
            text,
            completed: false,
            due_date: None,
            importance: None,
            recurring: None,
            subtasks: Vec::new(),
        })
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring.is_some()
    }

    /// The next free subtask id within this task.
    pub fn next_subtask_id(&self) -> u64 {
        self.subtasks.iter().map(|s| s.id + 1).max().unwrap_or(1)
    }

    /// Appends a new incomplete subtask and returns its id.
    pub fn add_subtask(&mut self, text: impl Into<String>) -> Result<u64> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::validation("subtask text must not be empty"));
        }
        let id = self.next_subtask_id();
        self.subtasks.push(Subtask {
            id,
            text,
            completed: false,
        });
        Ok(id)
    }

    pub fn subtask(&self, id: u64) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == id)
    }
}
