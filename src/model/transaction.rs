//! The Transaction entity for the spending ledger.

use crate::error::{Error, Result};
use crate::model::{Amount, EntityId};
use crate::recur::Recurrence;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spending category. Income is always recorded under `Salary`.
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
pub enum Category {
    Salary,
    Shopping,
    Food,
    Transport,
    Bills,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Salary => "salary",
            Category::Shopping => "shopping",
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Bills => "bills",
            Category::Other => "other",
        };
        f.write_str(name)
    }
}

/// Transaction direction. Never stored: it is derived from the sign of the
/// amount, and only exists at the entry boundary where a user combines a
/// positive magnitude with a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Income,
    Expense,
}

/// A single ledger entry. The sign of `amount` encodes direction: positive
/// is income, negative is expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub id: EntityId,
    pub description: String,
    pub amount: Amount,
    pub date: NaiveDate,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurrence>,
}

impl Transaction {
    /// Entry-boundary constructor. Validates that `description` is non-empty
    /// and `magnitude` is strictly positive, applies the sign from
    /// `direction`, and normalizes income to the `Salary` category
    /// regardless of the category chosen at entry.
    pub fn from_parts(
        id: EntityId,
        description: impl Into<String>,
        direction: Direction,
        magnitude: Decimal,
        date: NaiveDate,
        category: Category,
        recurring: Option<Recurrence>,
    ) -> Result<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(Error::validation("transaction description must not be empty"));
        }
        if magnitude <= Decimal::ZERO {
            return Err(Error::validation("transaction amount must be positive"));
        }
        let (amount, category) = match direction {
            Direction::Income => (Amount::new(magnitude), Category::Salary),
            Direction::Expense => (Amount::new(-magnitude), category),
        };
        Ok(Transaction {
            id,
            description,
            amount,
            date,
            category,
            recurring,
        })
    }

    pub fn direction(&self) -> Direction {
        if self.amount.is_negative() {
            Direction::Expense
        } else {
            Direction::Income
        }
    }

    pub fn is_income(&self) -> bool {
        self.direction() == Direction::Income
    }

    pub fn is_expense(&self) -> bool {
        self.direction() == Direction::Expense
    }
}
