use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{info, warn};

use super::recurrence;
use super::recurring_model::{
    NewRecurringDefinition, ProcessDueReport, RecurringDefinition, RecurringOccurrence,
};
use super::recurring_traits::{RecurringRepositoryTrait, RecurringServiceTrait};
use crate::accounts::AccountRepositoryTrait;
use crate::db::WriteHandle;
use crate::transactions::{record_occurrence_in_tx, NewEntry, Transaction};
use crate::Result;

/// Scheduler and projection service for recurring transactions.
pub struct RecurringService {
    repository: Arc<dyn RecurringRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    writer: WriteHandle,
}

impl RecurringService {
    pub fn new(
        repository: Arc<dyn RecurringRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        writer: WriteHandle,
    ) -> Self {
        Self {
            repository,
            account_repository,
            writer,
        }
    }

    /// Walks one definition's due occurrences. Each occurrence runs as its
    /// own claim transaction, so two concurrent passes materialize it at
    /// most once and a failure never takes sibling occurrences down with it.
    async fn process_definition(
        &self,
        definition: &RecurringDefinition,
        as_of: NaiveDate,
        report: &mut ProcessDueReport,
    ) {
        let mut cursor = definition.next_run_date;

        while cursor <= as_of {
            if let Some(end) = definition.end_date {
                if cursor > end {
                    break;
                }
            }

            let occurrence_date = cursor;
            let next = recurrence::next_occurrence(occurrence_date, &definition.frequency);

            let repository = Arc::clone(&self.repository);
            let snapshot = definition.clone();
            let outcome: Result<(bool, Option<Transaction>)> = self
                .writer
                .exec(move |conn| {
                    let claimed = repository.claim_in_tx(
                        &snapshot.id,
                        occurrence_date,
                        occurrence_date,
                        next,
                        conn,
                    )?;
                    if !claimed {
                        return Ok((false, None));
                    }

                    if !snapshot.auto_create {
                        return Ok((true, None));
                    }

                    let entry = NewEntry {
                        id: None,
                        account_id: snapshot.account_id.clone(),
                        transaction_type: snapshot.transaction_type,
                        amount: snapshot.amount,
                        transaction_date: occurrence_date,
                        category_id: snapshot.category_id.clone(),
                    };
                    let txn = record_occurrence_in_tx(conn, &entry, &snapshot.currency)?;
                    Ok((true, Some(txn)))
                })
                .await;

            match outcome {
                Ok((false, _)) => {
                    // Another worker holds this occurrence; leave the
                    // definition to it.
                    break;
                }
                Ok((true, materialized)) => {
                    if let Some(txn) = materialized {
                        report.materialized.push(txn);
                    }
                    cursor = next;
                }
                Err(err) => {
                    warn!(
                        "Skipping recurring definition {} at {}: {}",
                        definition.id, occurrence_date, err
                    );
                    report.skipped.push(definition.id.clone());
                    return;
                }
            }
        }

        // A cursor past the end date means the definition is finished. A
        // failed deactivation must not take the rest of the pass down.
        if let Some(end) = definition.end_date {
            if cursor > end {
                match self.repository.set_active(&definition.id, false).await {
                    Ok(()) => {
                        info!("Recurring definition {} completed its schedule", definition.id)
                    }
                    Err(err) => {
                        warn!(
                            "Failed to deactivate finished definition {}: {}",
                            definition.id, err
                        );
                        report.skipped.push(definition.id.clone());
                    }
                }
            }
        }
    }
}

#[async_trait]
impl RecurringServiceTrait for RecurringService {
    async fn create_definition(
        &self,
        new_def: NewRecurringDefinition,
    ) -> Result<RecurringDefinition> {
        new_def.validate()?;

        let account = self.account_repository.get_by_id(&new_def.account_id)?;
        self.repository.create(new_def, account.currency).await
    }

    async fn pause(&self, definition_id: &str) -> Result<()> {
        self.repository.set_active(definition_id, false).await
    }

    async fn resume(&self, definition_id: &str) -> Result<()> {
        self.repository.set_active(definition_id, true).await
    }

    async fn process_due(&self, as_of: NaiveDate) -> Result<ProcessDueReport> {
        let due = self.repository.list_due(as_of)?;
        let mut report = ProcessDueReport::default();

        for definition in &due {
            self.process_definition(definition, as_of, &mut report).await;
        }

        info!(
            "Recurring pass at {}: {} materialized, {} skipped",
            as_of,
            report.materialized.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn get_definition(&self, definition_id: &str) -> Result<RecurringDefinition> {
        self.repository.get_by_id(definition_id)
    }

    fn list_by_account(&self, account_id: &str) -> Result<Vec<RecurringDefinition>> {
        self.repository.list_by_account(account_id)
    }

    fn preview(&self, definition: &RecurringDefinition, count: usize) -> Vec<RecurringOccurrence> {
        let mut occurrences = Vec::new();
        let mut date = definition.next_run_date;

        while occurrences.len() < count {
            if let Some(end) = definition.end_date {
                if date > end {
                    break;
                }
            }
            occurrences.push(RecurringOccurrence {
                date,
                amount: definition.amount,
                transaction_type: definition.transaction_type,
            });
            date = recurrence::next_occurrence(date, &definition.frequency);
        }

        occurrences
    }
}
