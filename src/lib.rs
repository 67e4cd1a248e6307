//! Moneybook Core - personal finance domain logic.
//!
//! This crate tracks accounts and their running balances, records the
//! transactions that mutate them (including paired cross-account transfers),
//! converts amounts between currencies from stored exchange rates, and
//! materializes transactions from recurring definitions on a calendar
//! schedule. It is the storage-backed core; request handling, auth and rate
//! ingestion live in the outer application.

pub mod db;

pub mod accounts;
pub mod errors;
pub mod fx;
pub mod recurring;
pub mod schema;
pub mod transactions;

pub use errors::Error;
pub use errors::Result;
