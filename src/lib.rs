//! daybook: a personal organizer core — tasks, a spending ledger and a
//! shopping list behind a single local-first persistence and lifecycle
//! layer.
//!
//! The interesting parts live in `recur` (how completing a recurring task
//! rolls it forward), `sort` (the deterministic display order), and
//! `controller` (optimistic mutation over the durable store with per-id
//! write serialization and rollback).

pub mod args;
pub mod commands;
mod config;
pub mod controller;
pub mod enrich;
mod error;
pub mod model;
pub mod recur;
pub mod sort;
pub mod store;
pub mod subtask;
#[cfg(test)]
mod test;
mod utils;

pub use config::Config;
pub use error::{Error, Result};
pub use store::Mode;
