use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;

use super::transactions_errors::TransactionError;
use super::transactions_model::{
    NewEntry, NewTransfer, Transaction, TransactionDB, TransactionType, TransactionUpdate,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::accounts::{AccountLedger, AccountRepositoryTrait};
use crate::db::WriteHandle;
use crate::fx::FxServiceTrait;
use crate::schema::transactions;
use crate::Result;

/// Inserts one entry row and applies its balance delta on the caller's
/// transaction connection. This is the recording core shared by the service
/// and the recurring scheduler, which materializes occurrences inside its
/// own claim transaction.
pub fn record_occurrence_in_tx(
    conn: &mut SqliteConnection,
    entry: &NewEntry,
    currency: &str,
) -> Result<Transaction> {
    entry.validate()?;

    let row = TransactionDB::from_entry(entry, currency);
    diesel::insert_into(transactions::table)
        .values(&row)
        .execute(conn)?;

    let txn: Transaction = row.try_into()?;
    AccountLedger::apply(conn, &txn.account_id, txn.signed_effect())?;

    Ok(txn)
}

/// Service for recording, editing and deleting transactions.
///
/// Every mutation runs as one write-actor job, so the row changes and their
/// ledger deltas commit or roll back as a unit and the invariant
/// `current_balance = initial_balance + sum of signed effects` holds at
/// every commit point.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
    writer: WriteHandle,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
        writer: WriteHandle,
    ) -> Self {
        Self {
            repository,
            account_repository,
            fx_service,
            writer,
        }
    }

    async fn record_entry(
        &self,
        mut entry: NewEntry,
        transaction_type: TransactionType,
    ) -> Result<Transaction> {
        entry.transaction_type = transaction_type;
        entry.validate()?;

        // Rows are denominated in their account's currency.
        let account = self.account_repository.get_by_id(&entry.account_id)?;
        let currency = account.currency;

        self.writer
            .exec(move |conn| record_occurrence_in_tx(conn, &entry, &currency))
            .await
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn record_income(&self, entry: NewEntry) -> Result<Transaction> {
        self.record_entry(entry, TransactionType::Income).await
    }

    async fn record_expense(&self, entry: NewEntry) -> Result<Transaction> {
        self.record_entry(entry, TransactionType::Expense).await
    }

    async fn record_transfer(&self, transfer: NewTransfer) -> Result<(Transaction, Transaction)> {
        transfer.validate()?;

        let from_account = self.account_repository.get_by_id(&transfer.from_account_id)?;
        let to_account = self.account_repository.get_by_id(&transfer.to_account_id)?;

        // Resolve the incoming-leg amount up front. A missing rate fails the
        // whole operation here, before any row exists.
        let incoming_amount = if from_account.currency == to_account.currency {
            transfer.amount
        } else {
            self.fx_service.convert(
                transfer.amount,
                &from_account.currency,
                &to_account.currency,
                transfer.rate_source.as_deref(),
            )?
        };

        // Rounding into a coarser currency can collapse a tiny amount to
        // zero; a zero-amount leg would break the positive-amount rule.
        if incoming_amount <= 0 {
            return Err(TransactionError::InvalidData(format!(
                "Transfer of {} {} converts to {} {}; amount is too small to transfer",
                transfer.amount, from_account.currency, incoming_amount, to_account.currency
            ))
            .into());
        }

        let outgoing_id = uuid::Uuid::new_v4().to_string();
        let incoming_id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().naive_utc();

        let outgoing_row = TransactionDB {
            id: outgoing_id.clone(),
            account_id: from_account.id.clone(),
            transaction_type: TransactionType::Expense.as_str().to_string(),
            amount: transfer.amount,
            currency: from_account.currency.clone(),
            transaction_date: transfer.transaction_date,
            category_id: transfer.category_id.clone(),
            transfer_account_id: Some(to_account.id.clone()),
            transfer_transaction_id: Some(incoming_id.clone()),
            reconciled_at: None,
            created_at: now,
            updated_at: now,
        };

        let incoming_row = TransactionDB {
            id: incoming_id,
            account_id: to_account.id.clone(),
            transaction_type: TransactionType::Income.as_str().to_string(),
            amount: incoming_amount,
            currency: to_account.currency.clone(),
            transaction_date: transfer.transaction_date,
            category_id: transfer.category_id,
            transfer_account_id: Some(from_account.id.clone()),
            transfer_transaction_id: Some(outgoing_id),
            reconciled_at: None,
            created_at: now,
            updated_at: now,
        };

        let repository = Arc::clone(&self.repository);
        self.writer
            .exec(move |conn| {
                let outgoing = repository.insert_in_tx(outgoing_row, conn)?;
                let incoming = repository.insert_in_tx(incoming_row, conn)?;

                AccountLedger::apply(conn, &outgoing.account_id, outgoing.signed_effect())?;
                AccountLedger::apply(conn, &incoming.account_id, incoming.signed_effect())?;

                debug!(
                    "Recorded transfer {} -> {} ({} -> {})",
                    outgoing.account_id, incoming.account_id, outgoing.amount, incoming.amount
                );

                Ok((outgoing, incoming))
            })
            .await
    }

    async fn update_transaction(&self, update: TransactionUpdate) -> Result<Transaction> {
        if let Some(amount) = update.amount {
            if amount <= 0 {
                return Err(TransactionError::InvalidData(format!(
                    "Amount must be positive, got {}",
                    amount
                ))
                .into());
            }
        }

        // A move to another account re-denominates the row in that account's
        // currency; the amount itself is never re-converted on edit.
        let new_currency = match update.account_id.as_deref() {
            Some(target) => Some(self.account_repository.get_by_id(target)?.currency),
            None => None,
        };

        let repository = Arc::clone(&self.repository);
        self.writer
            .exec(move |conn| {
                let existing = repository.get_in_tx(&update.id, conn)?;

                if existing.is_transfer_leg() {
                    return Err(
                        TransactionError::EditTransferLegForbidden(existing.id).into()
                    );
                }

                let old_effect = existing.signed_effect();
                let old_account = existing.account_id.clone();

                let mut row = TransactionDB::from(&existing);
                if let Some(account) = update.account_id {
                    row.account_id = account;
                }
                if let Some(currency) = new_currency {
                    row.currency = currency;
                }
                if let Some(transaction_type) = update.transaction_type {
                    row.transaction_type = transaction_type.as_str().to_string();
                }
                if let Some(amount) = update.amount {
                    row.amount = amount;
                }
                if let Some(date) = update.transaction_date {
                    row.transaction_date = date;
                }
                if let Some(category) = update.category_id {
                    row.category_id = category;
                }
                row.updated_at = chrono::Utc::now().naive_utc();

                let updated = repository.update_in_tx(row, conn)?;
                let new_effect = updated.signed_effect();

                if updated.account_id == old_account {
                    // Single delta correction; no-op edits apply zero.
                    AccountLedger::apply(conn, &old_account, new_effect - old_effect)?;
                } else {
                    AccountLedger::reverse(conn, &old_account, old_effect)?;
                    AccountLedger::apply(conn, &updated.account_id, new_effect)?;
                }

                Ok(updated)
            })
            .await
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<()> {
        let id_owned = transaction_id.to_string();
        let repository = Arc::clone(&self.repository);

        self.writer
            .exec(move |conn| {
                let existing = repository.get_in_tx(&id_owned, conn)?;

                AccountLedger::reverse(conn, &existing.account_id, existing.signed_effect())?;

                // Deleting one leg of a transfer removes the pair and
                // restores both balances.
                if let Some(pair_id) = existing.transfer_transaction_id.clone() {
                    let pair = repository.get_in_tx(&pair_id, conn)?;
                    AccountLedger::reverse(conn, &pair.account_id, pair.signed_effect())?;
                    repository.delete_in_tx(&pair_id, conn)?;
                }

                repository.delete_in_tx(&existing.id, conn)?;
                Ok(())
            })
            .await
    }

    async fn set_reconciled(
        &self,
        transaction_id: &str,
        reconciled_at: Option<NaiveDateTime>,
    ) -> Result<Transaction> {
        let id_owned = transaction_id.to_string();
        let repository = Arc::clone(&self.repository);

        self.writer
            .exec(move |conn| {
                let existing = repository.get_in_tx(&id_owned, conn)?;

                let mut row = TransactionDB::from(&existing);
                row.reconciled_at = reconciled_at;
                row.updated_at = chrono::Utc::now().naive_utc();

                repository.update_in_tx(row, conn)
            })
            .await
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.repository.get_by_id(transaction_id)
    }

    fn list_by_account(&self, account_id: &str) -> Result<Vec<Transaction>> {
        self.repository.list_by_account(account_id)
    }
}
