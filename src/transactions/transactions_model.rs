use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::transactions_errors::TransactionError;
use crate::schema::transactions;

/// Persisted transaction kinds. A transfer is not a row type of its own: it
/// is recorded as one expense-type leg on the source account and one
/// income-type leg on the destination, linked through
/// `transfer_transaction_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }

    pub fn from_str(value: &str) -> Result<Self, TransactionError> {
        match value {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(TransactionError::InvalidData(format!(
                "Unknown transaction type: {}",
                other
            ))),
        }
    }
}

/// A recorded ledger entry in the domain representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub transaction_type: TransactionType,
    /// Always positive, in minor units of `currency`. Direction comes from
    /// the type.
    pub amount: i64,
    pub currency: String,
    pub transaction_date: NaiveDate,
    pub category_id: Option<String>,
    pub transfer_account_id: Option<String>,
    pub transfer_transaction_id: Option<String>,
    pub reconciled_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    /// The signed contribution of this row to its account's balance:
    /// `+amount` for income, `-amount` for expense.
    pub fn signed_effect(&self) -> i64 {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    /// Whether this row is one leg of a transfer pair.
    pub fn is_transfer_leg(&self) -> bool {
        self.transfer_transaction_id.is_some()
    }
}

/// Input for recording a plain income or expense entry. The currency is the
/// account's own; the service resolves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub id: Option<String>,
    pub account_id: String,
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub transaction_date: NaiveDate,
    pub category_id: Option<String>,
}

impl NewEntry {
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.account_id.trim().is_empty() {
            return Err(TransactionError::InvalidData(
                "Account id cannot be empty".to_string(),
            ));
        }
        if self.amount <= 0 {
            return Err(TransactionError::InvalidData(format!(
                "Amount must be positive, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Input for recording a transfer between two accounts. `amount` is in minor
/// units of the source account's currency; the destination leg amount is
/// derived by conversion when the currencies differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransfer {
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount: i64,
    pub transaction_date: NaiveDate,
    pub category_id: Option<String>,
    /// Preferred rate provider tag, when the caller cares which quote is
    /// used.
    pub rate_source: Option<String>,
}

impl NewTransfer {
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.from_account_id == self.to_account_id {
            return Err(TransactionError::TransferSameAccount(
                self.from_account_id.clone(),
            ));
        }
        if self.amount <= 0 {
            return Err(TransactionError::InvalidData(format!(
                "Transfer amount must be positive, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Partial update for a plain entry. `None` fields keep their current value;
/// `category_id: Some(None)` clears the category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub id: String,
    pub account_id: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<i64>,
    pub transaction_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<String>>,
}

/// Database row for the `transactions` table.
#[derive(
    Debug, Clone, Queryable, Selectable, Insertable, AsChangeset, Identifiable,
)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
// Updates write the whole merged row, so a None really means NULL.
#[diesel(treat_none_as_null = true)]
pub struct TransactionDB {
    pub id: String,
    pub account_id: String,
    pub transaction_type: String,
    pub amount: i64,
    pub currency: String,
    pub transaction_date: NaiveDate,
    pub category_id: Option<String>,
    pub transfer_account_id: Option<String>,
    pub transfer_transaction_id: Option<String>,
    pub reconciled_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = TransactionError;

    fn try_from(db: TransactionDB) -> Result<Self, TransactionError> {
        Ok(Transaction {
            transaction_type: TransactionType::from_str(&db.transaction_type)?,
            id: db.id,
            account_id: db.account_id,
            amount: db.amount,
            currency: db.currency,
            transaction_date: db.transaction_date,
            category_id: db.category_id,
            transfer_account_id: db.transfer_account_id,
            transfer_transaction_id: db.transfer_transaction_id,
            reconciled_at: db.reconciled_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<&Transaction> for TransactionDB {
    fn from(txn: &Transaction) -> Self {
        TransactionDB {
            id: txn.id.clone(),
            account_id: txn.account_id.clone(),
            transaction_type: txn.transaction_type.as_str().to_string(),
            amount: txn.amount,
            currency: txn.currency.clone(),
            transaction_date: txn.transaction_date,
            category_id: txn.category_id.clone(),
            transfer_account_id: txn.transfer_account_id.clone(),
            transfer_transaction_id: txn.transfer_transaction_id.clone(),
            reconciled_at: txn.reconciled_at,
            created_at: txn.created_at,
            updated_at: txn.updated_at,
        }
    }
}

impl TransactionDB {
    /// Builds a fresh row for a plain entry; transfer linkage stays empty.
    pub fn from_entry(entry: &NewEntry, currency: &str) -> Self {
        let now = chrono::Utc::now().naive_utc();
        TransactionDB {
            id: entry
                .id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            account_id: entry.account_id.clone(),
            transaction_type: entry.transaction_type.as_str().to_string(),
            amount: entry.amount,
            currency: currency.to_string(),
            transaction_date: entry.transaction_date,
            category_id: entry.category_id.clone(),
            transfer_account_id: None,
            transfer_transaction_id: None,
            reconciled_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
