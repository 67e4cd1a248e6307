//! Accounts module - domain models, ledger, repository and service.

mod accounts_errors;
mod accounts_ledger;
mod accounts_model;
mod accounts_repository;
mod accounts_service;
mod accounts_traits;

#[cfg(test)]
mod accounts_model_tests;

pub use accounts_errors::AccountError;
pub use accounts_ledger::AccountLedger;
pub use accounts_model::{Account, AccountType, AccountUpdate, ConvertedBalance, NetWorth, NewAccount};
pub use accounts_repository::AccountRepository;
pub use accounts_service::AccountService;
pub use accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
