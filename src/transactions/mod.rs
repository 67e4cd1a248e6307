//! Transactions module - recording, editing and deleting ledger entries.

mod transactions_errors;
mod transactions_model;
mod transactions_repository;
mod transactions_service;
mod transactions_traits;


pub use transactions_errors::TransactionError;
pub use transactions_model::{
    NewEntry, NewTransfer, Transaction, TransactionDB, TransactionType, TransactionUpdate,
};
pub use transactions_repository::TransactionRepository;
pub use transactions_service::{record_occurrence_in_tx, TransactionService};
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
