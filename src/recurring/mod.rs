//! Recurring module - scheduled transaction templates and their
//! materialization.

pub mod recurrence;

mod recurring_errors;
mod recurring_model;
mod recurring_repository;
mod recurring_service;
mod recurring_traits;

#[cfg(test)]
mod recurring_model_tests;
#[cfg(test)]
mod recurring_service_tests;

pub use recurring_errors::RecurringError;
pub use recurring_model::{
    Frequency, NewRecurringDefinition, ProcessDueReport, RecurringDB, RecurringDefinition,
    RecurringOccurrence,
};
pub use recurring_repository::RecurringRepository;
pub use recurring_service::RecurringService;
pub use recurring_traits::{RecurringRepositoryTrait, RecurringServiceTrait};
