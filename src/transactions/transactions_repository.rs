use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::transactions_errors::TransactionError;
use super::transactions_model::{Transaction, TransactionDB};
use super::transactions_traits::TransactionRepositoryTrait;
use crate::db::{get_connection, DbPool};
use crate::schema::transactions;
use crate::schema::transactions::dsl::*;
use crate::Result;

/// Repository for transaction rows.
pub struct TransactionRepository {
    pool: Arc<DbPool>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;

        let row = transactions
            .select(TransactionDB::as_select())
            .find(transaction_id)
            .first::<TransactionDB>(&mut conn)
            .map_err(TransactionError::from)?;

        Ok(row.try_into()?)
    }

    fn list_by_account(&self, for_account: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = transactions
            .filter(account_id.eq(for_account))
            .select(TransactionDB::as_select())
            .order((transaction_date.desc(), created_at.desc()))
            .load::<TransactionDB>(&mut conn)?;

        rows.into_iter()
            .map(|row| Ok(Transaction::try_from(row)?))
            .collect()
    }

    fn insert_in_tx(&self, row: TransactionDB, conn: &mut SqliteConnection) -> Result<Transaction> {
        diesel::insert_into(transactions::table)
            .values(&row)
            .execute(conn)?;

        Ok(row.try_into()?)
    }

    fn get_in_tx(&self, transaction_id: &str, conn: &mut SqliteConnection) -> Result<Transaction> {
        let row = transactions
            .select(TransactionDB::as_select())
            .find(transaction_id)
            .first::<TransactionDB>(conn)
            .map_err(TransactionError::from)?;

        Ok(row.try_into()?)
    }

    fn update_in_tx(&self, row: TransactionDB, conn: &mut SqliteConnection) -> Result<Transaction> {
        diesel::update(transactions.find(&row.id))
            .set(&row)
            .execute(conn)?;

        Ok(row.try_into()?)
    }

    fn delete_in_tx(&self, transaction_id: &str, conn: &mut SqliteConnection) -> Result<()> {
        let deleted = diesel::delete(transactions.find(transaction_id)).execute(conn)?;

        if deleted == 0 {
            return Err(TransactionError::NotFound(transaction_id.to_string()).into());
        }

        Ok(())
    }
}
