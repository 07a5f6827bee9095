//! The ListItem entity for the shopping list.

use crate::error::{Error, Result};
use crate::model::EntityId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A shopping list entry.
///
/// Completion happens through the pricing step: `mark_priced` records the
/// quantity and unit price bought and derives the total. The three pricing
/// fields are present exactly when `completed` is true; reopening the item
/// clears them. The fields are private so that invariant cannot be broken
/// from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListItem {
    pub id: EntityId,
    pub text: String,
    completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_price: Option<Decimal>,
}

impl ListItem {
    /// Creates an open (unpriced) item. Fails if `text` is empty.
    pub fn new(id: EntityId, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::validation("list item text must not be empty"));
        }
        Ok(ListItem {
            id,
            text,
            completed: false,
            quantity: None,
            unit_price: None,
            total_price: None,
        })
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn quantity(&self) -> Option<u32> {
        self.quantity
    }

    pub fn unit_price(&self) -> Option<Decimal> {
        self.unit_price
    }

    pub fn total_price(&self) -> Option<Decimal> {
        self.total_price
    }

    /// Completes the item with its purchase details. `total_price` is always
    /// `quantity * unit_price`; both inputs must be strictly positive.
    pub fn mark_priced(&mut self, quantity: u32, unit_price: Decimal) -> Result<()> {
        if quantity == 0 {
            return Err(Error::validation("quantity must be positive"));
        }
        if unit_price <= Decimal::ZERO {
            return Err(Error::validation("unit price must be positive"));
        }
        self.quantity = Some(quantity);
        self.unit_price = Some(unit_price);
        self.total_price = Some(unit_price * Decimal::from(quantity));
        self.completed = true;
        Ok(())
    }

    /// Reopens the item, clearing all pricing fields.
    pub fn mark_unpriced(&mut self) {
        self.quantity = None;
        self.unit_price = None;
        self.total_price = None;
        self.completed = false;
    }
}
