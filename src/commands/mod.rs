//! Command handlers for the daybook CLI.
//!
//! Handlers are the "form layer": they turn CLI input into validated model
//! values, run the corresponding controller operation, flush pending writes
//! before the process exits, and report the outcome.

mod ledger;
mod shop;
mod task;

pub use ledger::{
    add as ledger_add, list as ledger_list, rm as ledger_rm,
};
pub use shop::{
    add as shop_add, clear as shop_clear, list as shop_list, price as shop_price,
    reopen as shop_reopen, rm as shop_rm,
};
pub use task::{
    add as task_add, breakdown as task_breakdown, done as task_done, focus as task_focus,
    list as task_list, rm as task_rm, sub_add as task_sub_add, sub_done as task_sub_done,
    sub_move as task_sub_move,
};

use crate::config::Config;
use crate::store::{Entity, JsonStore, MemStore, Mode, Store};
use crate::Result;
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;

/// Creates the daybook home directory and its configuration.
pub async fn init(home: impl Into<std::path::PathBuf>) -> Result<Out<()>> {
    let config = Config::create(home).await?;
    Ok(Out::new_message(format!(
        "Initialized daybook home at {}",
        config.root().display()
    )))
}

/// The output type for a command: a printable message plus, optionally, the
/// structured data the command produced.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of
    /// the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    pub fn new_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn with_structure(message: impl Into<String>, structure: T) -> Self {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    pub fn print(&self) {
        if !self.message.is_empty() {
            println!("{}", self.message);
        }
    }
}

/// Picks the store backend for one namespace according to the mode.
pub(crate) fn store_for<T: Entity>(config: &Config, mode: Mode) -> Arc<dyn Store<T>> {
    match mode {
        Mode::Disk => Arc::new(JsonStore::new(config.data_dir())),
        Mode::Memory => Arc::new(MemStore::new()),
    }
}
