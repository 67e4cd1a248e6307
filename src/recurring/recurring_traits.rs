use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::sqlite::SqliteConnection;

use super::recurring_model::{
    NewRecurringDefinition, ProcessDueReport, RecurringDefinition, RecurringOccurrence,
};
use crate::Result;

/// Trait defining the contract for recurring-definition persistence.
#[async_trait]
pub trait RecurringRepositoryTrait: Send + Sync {
    async fn create(
        &self,
        new_def: NewRecurringDefinition,
        currency: String,
    ) -> Result<RecurringDefinition>;
    async fn set_active(&self, definition_id: &str, is_active: bool) -> Result<()>;

    fn get_by_id(&self, definition_id: &str) -> Result<RecurringDefinition>;
    fn list_by_account(&self, account_id: &str) -> Result<Vec<RecurringDefinition>>;
    /// Active definitions with `next_run_date <= as_of`.
    fn list_due(&self, as_of: NaiveDate) -> Result<Vec<RecurringDefinition>>;

    /// Atomically claims one occurrence by advancing the schedule cursor,
    /// conditioned on the cursor still being where the caller observed it.
    /// Returns false when another worker claimed it first.
    fn claim_in_tx(
        &self,
        definition_id: &str,
        expected_next: NaiveDate,
        new_last: NaiveDate,
        new_next: NaiveDate,
        conn: &mut SqliteConnection,
    ) -> Result<bool>;
}

/// Trait defining the contract for the recurring scheduler.
#[async_trait]
pub trait RecurringServiceTrait: Send + Sync {
    async fn create_definition(
        &self,
        new_def: NewRecurringDefinition,
    ) -> Result<RecurringDefinition>;
    async fn pause(&self, definition_id: &str) -> Result<()>;
    /// Reactivates a paused definition without touching its schedule
    /// cursor; missed occurrences catch up on the next pass.
    async fn resume(&self, definition_id: &str) -> Result<()>;

    /// Materializes every due occurrence up to `as_of`, one claim
    /// transaction per occurrence. Failures are reported, not propagated.
    async fn process_due(&self, as_of: NaiveDate) -> Result<ProcessDueReport>;

    fn get_definition(&self, definition_id: &str) -> Result<RecurringDefinition>;
    fn list_by_account(&self, account_id: &str) -> Result<Vec<RecurringDefinition>>;

    /// Pure projection of the next `count` occurrences, stopping at
    /// `end_date`.
    fn preview(&self, definition: &RecurringDefinition, count: usize) -> Vec<RecurringOccurrence>;
}
