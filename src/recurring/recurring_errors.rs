use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for recurring-schedule operations
#[derive(Debug, Error)]
pub enum RecurringError {
    #[error("Recurring definition not found: {0}")]
    NotFound(String),
    #[error("Invalid recurring definition: {0}")]
    InvalidData(String),
    #[error("Invalid frequency rule: {0}")]
    InvalidFrequency(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DieselError> for RecurringError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RecurringError::NotFound("Record not found".to_string()),
            _ => RecurringError::DatabaseError(err.to_string()),
        }
    }
}

impl From<RecurringError> for String {
    fn from(err: RecurringError) -> Self {
        err.to_string()
    }
}
