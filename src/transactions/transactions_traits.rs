use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::sqlite::SqliteConnection;

use super::transactions_model::{
    NewEntry, NewTransfer, Transaction, TransactionDB, TransactionUpdate,
};
use crate::Result;

/// Trait defining the contract for transaction persistence.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction>;
    fn list_by_account(&self, account_id: &str) -> Result<Vec<Transaction>>;

    // Transactional building blocks; each runs on the caller's write
    // connection so the row change and its ledger delta commit together.
    fn insert_in_tx(&self, row: TransactionDB, conn: &mut SqliteConnection) -> Result<Transaction>;
    fn get_in_tx(&self, transaction_id: &str, conn: &mut SqliteConnection) -> Result<Transaction>;
    fn update_in_tx(&self, row: TransactionDB, conn: &mut SqliteConnection) -> Result<Transaction>;
    fn delete_in_tx(&self, transaction_id: &str, conn: &mut SqliteConnection) -> Result<()>;
}

/// Trait defining the contract for recording and editing transactions.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    async fn record_income(&self, entry: NewEntry) -> Result<Transaction>;
    async fn record_expense(&self, entry: NewEntry) -> Result<Transaction>;

    /// Records both legs of a transfer in one atomic unit. Returns the
    /// outgoing leg first, incoming second.
    async fn record_transfer(&self, transfer: NewTransfer) -> Result<(Transaction, Transaction)>;

    async fn update_transaction(&self, update: TransactionUpdate) -> Result<Transaction>;
    async fn delete_transaction(&self, transaction_id: &str) -> Result<()>;
    async fn set_reconciled(
        &self,
        transaction_id: &str,
        reconciled_at: Option<NaiveDateTime>,
    ) -> Result<Transaction>;

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;
    fn list_by_account(&self, account_id: &str) -> Result<Vec<Transaction>>;
}
