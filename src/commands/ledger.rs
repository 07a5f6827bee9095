//! Handlers for the `daybook ledger` subcommands.

use crate::commands::{store_for, Out};
use crate::config::Config;
use crate::controller::Collection;
use crate::model::{Category, Direction, EntityId, Transaction};
use crate::recur::{Frequency, Recurrence};
use crate::sort::sort_transactions;
use crate::store::Mode;
use crate::Result;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

async fn collection(config: &Config, mode: Mode) -> Result<Collection<Transaction>> {
    Collection::load(store_for(config, mode), Some(sort_transactions)).await
}

#[allow(clippy::too_many_arguments)]
pub async fn add(
    config: &Config,
    mode: Mode,
    description: String,
    amount: Decimal,
    income: bool,
    date: Option<NaiveDate>,
    category: Category,
    every: Option<Frequency>,
) -> Result<Out<Transaction>> {
    let col = collection(config, mode).await?;
    let direction = if income {
        Direction::Income
    } else {
        Direction::Expense
    };
    let transaction = Transaction::from_parts(
        col.next_id(),
        description,
        direction,
        amount,
        date.unwrap_or_else(|| Local::now().date_naive()),
        category,
        every.map(Recurrence::new),
    )?;
    let transaction = col.create(transaction).await?;
    col.flush().await;
    Ok(Out::with_structure(
        format!(
            "Recorded {} {} on {}",
            transaction.amount, transaction.category, transaction.date
        ),
        transaction,
    ))
}

pub async fn list(config: &Config, mode: Mode) -> Result<Out<Vec<Transaction>>> {
    let col = collection(config, mode).await?;
    let transactions = col.snapshot().await;
    if transactions.is_empty() {
        return Ok(Out::with_structure("No transactions.".to_string(), transactions));
    }
    let net: Decimal = transactions.iter().map(|t| t.amount.value()).sum();
    let mut lines: Vec<String> = transactions.iter().map(render).collect();
    lines.push(format!("net: {}", crate::model::Amount::new(net)));
    Ok(Out::with_structure(lines.join("\n"), transactions))
}

pub async fn rm(config: &Config, mode: Mode, id: &str) -> Result<Out<Transaction>> {
    let col = collection(config, mode).await?;
    let removed = col.delete(&EntityId::from(id)).await?;
    col.flush().await;
    Ok(Out::with_structure(
        format!("Deleted transaction {}", removed.id),
        removed,
    ))
}

fn render(transaction: &Transaction) -> String {
    let mut line = format!(
        "{}  {}  {:>12}  {}  {}",
        transaction.id,
        transaction.date,
        transaction.amount.to_string(),
        transaction.category,
        transaction.description
    );
    if let Some(recurrence) = transaction.recurring {
        line.push_str(&format!("  (every {:?})", recurrence.frequency).to_lowercase());
    }
    line
}
