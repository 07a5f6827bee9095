//! These structs provide the CLI interface for the daybook CLI.

use crate::model::{Category, Importance};
use crate::recur::Frequency;
use crate::subtask::DropSide;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// daybook: a personal organizer for your terminal.
///
/// Keeps three lists in a local datastore under your daybook home directory:
/// tasks (with due dates, importance, recurrence and subtasks), a spending
/// ledger, and a shopping list. Completing a recurring task rolls its due
/// date forward instead of finishing it.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the daybook home directory and initialize the configuration.
    Init,
    /// Manage tasks.
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Manage the spending ledger.
    Ledger {
        #[command(subcommand)]
        command: LedgerCommand,
    },
    /// Manage the shopping list.
    Shop {
        #[command(subcommand)]
        command: ShopCommand,
    },
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where daybook data and configuration is held.
    /// Defaults to ~/daybook
    #[arg(long, env = "DAYBOOK_HOME", default_value_t = default_daybook_home())]
    home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommand {
    /// Add a task.
    Add {
        /// The task text.
        text: String,
        /// Due date, YYYY-MM-DD.
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Task importance.
        #[arg(long, value_enum)]
        importance: Option<Importance>,
        /// Make the task recurring at this frequency.
        #[arg(long = "every", value_enum)]
        every: Option<Frequency>,
    },
    /// List tasks in display order.
    List,
    /// Toggle completion. For a recurring task this advances the due date
    /// and resets its subtasks instead of completing it.
    Done { id: String },
    /// Delete a task.
    Rm { id: String },
    /// Focus a task (bind it to the countdown timer).
    Focus { id: String },
    /// Ask the configured text-generation service to split the task into
    /// subtasks. Best effort: on failure the task is left unchanged.
    Breakdown { id: String },
    /// Add a subtask to a task.
    Sub { id: String, text: String },
    /// Toggle one subtask's completion.
    SubDone { id: String, subtask: u64 },
    /// Move a subtask next to another subtask of the same task.
    SubMove {
        id: String,
        /// The subtask to move.
        source: u64,
        /// The subtask to drop it next to.
        target: u64,
        /// Which side of the target to land on.
        #[arg(long, value_enum, default_value = "before")]
        side: DropSide,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum LedgerCommand {
    /// Record a transaction. The amount is a positive magnitude; direction
    /// comes from --income (default is expense).
    Add {
        /// What the money was for.
        description: String,
        /// Positive amount, e.g. 12.50.
        amount: Decimal,
        /// Record as income. Income is always categorized as salary.
        #[arg(long)]
        income: bool,
        /// Transaction date, YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Spending category.
        #[arg(long, value_enum, default_value = "other")]
        category: Category,
        /// Mark the transaction as recurring (informational).
        #[arg(long = "every", value_enum)]
        every: Option<Frequency>,
    },
    /// List transactions, newest first.
    List,
    /// Delete a transaction.
    Rm { id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ShopCommand {
    /// Add an item to the shopping list.
    Add { text: String },
    /// List shopping items.
    List,
    /// Complete an item by recording what was bought.
    Price {
        id: String,
        /// How many were bought.
        #[arg(long)]
        qty: u32,
        /// Price per unit.
        #[arg(long)]
        unit_price: Decimal,
    },
    /// Reopen a priced item, clearing quantity and prices.
    Reopen { id: String },
    /// Delete an item.
    Rm { id: String },
    /// Delete every item.
    Clear,
}

fn default_daybook_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("daybook"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or DAYBOOK_HOME instead of relying on the default \
                daybook home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("daybook")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
