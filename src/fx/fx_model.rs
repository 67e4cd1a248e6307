use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::fx_errors::FxError;
use crate::schema::{currencies, exchange_rates};

/// A stored exchange rate: one `base -> target` quote observed on
/// `rate_date`, tagged with the provider it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub id: String,
    pub base_currency: String,
    pub target_currency: String,
    pub rate: Decimal,
    pub rate_date: NaiveDate,
    pub source: String,
    pub created_at: NaiveDateTime,
}

/// Database row for an exchange rate. The rate is persisted as text so no
/// precision is lost through SQLite's float storage.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable)]
#[diesel(table_name = exchange_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExchangeRateDB {
    pub id: String,
    pub base_currency: String,
    pub target_currency: String,
    pub rate: String,
    pub rate_date: NaiveDate,
    pub source: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ExchangeRateDB> for ExchangeRate {
    type Error = FxError;

    fn try_from(db: ExchangeRateDB) -> Result<Self, FxError> {
        let rate = Decimal::from_str(&db.rate)
            .map_err(|e| FxError::InvalidRate(format!("{}: {}", db.rate, e)))?;
        Ok(ExchangeRate {
            id: db.id,
            base_currency: db.base_currency,
            target_currency: db.target_currency,
            rate,
            rate_date: db.rate_date,
            source: db.source,
            created_at: db.created_at,
        })
    }
}

/// Registry entry pinning the precision of a currency's minor unit.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Insertable)]
#[diesel(table_name = currencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub decimal_places: i32,
}

impl Currency {
    /// Fallback for codes missing from the registry.
    pub fn with_default_precision(code: &str) -> Self {
        Currency {
            code: code.to_string(),
            name: code.to_string(),
            decimal_places: 2,
        }
    }
}
