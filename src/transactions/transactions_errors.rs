use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for transaction operations
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Transfer source and destination must differ: {0}")]
    TransferSameAccount(String),
    #[error("Transfer legs cannot be edited, delete and re-record instead: {0}")]
    EditTransferLegForbidden(String),
    #[error("Transaction not found: {0}")]
    NotFound(String),
    #[error("Invalid transaction data: {0}")]
    InvalidData(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DieselError> for TransactionError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => TransactionError::NotFound("Record not found".to_string()),
            _ => TransactionError::DatabaseError(err.to_string()),
        }
    }
}

impl From<TransactionError> for String {
    fn from(err: TransactionError) -> Self {
        err.to_string()
    }
}
