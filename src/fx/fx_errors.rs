use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for exchange-rate operations
#[derive(Debug, Error)]
pub enum FxError {
    #[error("Exchange rate not found: {0}")]
    RateNotFound(String),
    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),
    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),
    #[error("Currency conversion error: {0}")]
    ConversionError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<FxError> for String {
    fn from(err: FxError) -> Self {
        err.to_string()
    }
}

impl From<DieselError> for FxError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => FxError::RateNotFound("Record not found".to_string()),
            _ => FxError::DatabaseError(err.to_string()),
        }
    }
}
