//! Handlers for the `daybook task` subcommands.

use crate::commands::{store_for, Out};
use crate::config::Config;
use crate::controller::TaskController;
use crate::enrich::{Breaker, HttpBreaker, StaticBreaker};
use crate::model::{EntityId, Importance, Task};
use crate::recur::{Frequency, Recurrence};
use crate::store::Mode;
use crate::subtask::DropSide;
use crate::Result;
use chrono::NaiveDate;
use std::sync::Arc;

async fn controller(config: &Config, mode: Mode) -> Result<TaskController> {
    let breaker: Arc<dyn Breaker> = match config.breakdown_url() {
        Some(url) => Arc::new(HttpBreaker::new(url)),
        // Unconfigured breakdown behaves like any other enrichment failure.
        None => Arc::new(StaticBreaker::failing()),
    };
    TaskController::load(store_for(config, mode), breaker).await
}

pub async fn add(
    config: &Config,
    mode: Mode,
    text: String,
    due: Option<NaiveDate>,
    importance: Option<Importance>,
    every: Option<Frequency>,
) -> Result<Out<Task>> {
    let ctl = controller(config, mode).await?;
    let task = ctl
        .create(text, due, importance, every.map(Recurrence::new))
        .await?;
    ctl.tasks().flush().await;
    Ok(Out::with_structure(
        format!("Added task {}", task.id),
        task,
    ))
}

pub async fn list(config: &Config, mode: Mode) -> Result<Out<Vec<Task>>> {
    let ctl = controller(config, mode).await?;
    let tasks = ctl.tasks().snapshot().await;
    if tasks.is_empty() {
        return Ok(Out::with_structure("No tasks.".to_string(), tasks));
    }
    let lines: Vec<String> = tasks.iter().map(render).collect();
    Ok(Out::with_structure(lines.join("\n"), tasks))
}

pub async fn done(config: &Config, mode: Mode, id: &str) -> Result<Out<Task>> {
    let ctl = controller(config, mode).await?;
    let task = ctl.toggle_complete(&EntityId::from(id)).await?;
    ctl.tasks().flush().await;
    let message = if task.is_recurring() {
        match task.due_date {
            Some(due) => format!("Recurring task {} rolled forward to {due}", task.id),
            None => format!("Recurring task {} rolled forward", task.id),
        }
    } else if task.completed {
        format!("Completed task {}", task.id)
    } else {
        format!("Reopened task {}", task.id)
    };
    Ok(Out::with_structure(message, task))
}

pub async fn rm(config: &Config, mode: Mode, id: &str) -> Result<Out<Task>> {
    let ctl = controller(config, mode).await?;
    let removed = ctl.delete(&EntityId::from(id)).await?;
    ctl.tasks().flush().await;
    Ok(Out::with_structure(
        format!("Deleted task {}", removed.id),
        removed,
    ))
}

pub async fn focus(config: &Config, mode: Mode, id: &str) -> Result<Out<()>> {
    let ctl = controller(config, mode).await?;
    ctl.set_focus(&EntityId::from(id)).await?;
    Ok(Out::new_message(format!("Focused task {id}")))
}

pub async fn breakdown(config: &Config, mode: Mode, id: &str) -> Result<Out<Task>> {
    if config.breakdown_url().is_none() {
        return Ok(Out::new_message(
            "Breakdown is not configured; set breakdown_url in config.json",
        ));
    }
    let ctl = controller(config, mode).await?;
    let task = ctl.break_down(&EntityId::from(id)).await?;
    ctl.tasks().flush().await;
    Ok(Out::with_structure(
        format!("Task {} now has {} subtasks", task.id, task.subtasks.len()),
        task,
    ))
}

pub async fn sub_add(config: &Config, mode: Mode, id: &str, text: String) -> Result<Out<Task>> {
    let ctl = controller(config, mode).await?;
    let id = EntityId::from(id);
    let mut task = ctl
        .tasks()
        .get(&id)
        .await
        .ok_or_else(|| crate::Error::NotFound(id.to_string()))?;
    let subtask_id = task.add_subtask(text)?;
    let task = ctl.update(task).await?;
    ctl.tasks().flush().await;
    Ok(Out::with_structure(
        format!("Added subtask {subtask_id} to task {}", task.id),
        task,
    ))
}

pub async fn sub_done(config: &Config, mode: Mode, id: &str, subtask: u64) -> Result<Out<Task>> {
    let ctl = controller(config, mode).await?;
    let task = ctl.toggle_subtask(&EntityId::from(id), subtask).await?;
    ctl.tasks().flush().await;
    Ok(Out::with_structure(
        format!("Toggled subtask {subtask} of task {}", task.id),
        task,
    ))
}

pub async fn sub_move(
    config: &Config,
    mode: Mode,
    id: &str,
    source: u64,
    target: u64,
    side: DropSide,
) -> Result<Out<Task>> {
    let ctl = controller(config, mode).await?;
    let task = ctl
        .reorder_subtask(&EntityId::from(id), source, target, side)
        .await?;
    ctl.tasks().flush().await;
    Ok(Out::with_structure(
        format!("Reordered subtasks of task {}", task.id),
        task,
    ))
}

fn render(task: &Task) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    let mut line = format!("[{check}] {}  {}", task.id, task.text);
    let mut notes: Vec<String> = Vec::new();
    if let Some(importance) = task.importance {
        notes.push(format!("{importance:?}").to_lowercase());
    }
    if let Some(due) = task.due_date {
        notes.push(format!("due {due}"));
    }
    if let Some(recurrence) = task.recurring {
        notes.push(format!("every {:?}", recurrence.frequency).to_lowercase());
    }
    if !notes.is_empty() {
        line.push_str(&format!("  ({})", notes.join(", ")));
    }
    for subtask in &task.subtasks {
        let check = if subtask.completed { 'x' } else { ' ' };
        line.push_str(&format!("\n      [{check}] {}. {}", subtask.id, subtask.text));
    }
    line
}
