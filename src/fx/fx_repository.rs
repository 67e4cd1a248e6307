use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use super::fx_model::{Currency, ExchangeRate, ExchangeRateDB};
use super::fx_traits::FxRepositoryTrait;
use crate::db::{get_connection, DbPool};
use crate::schema::{currencies, exchange_rates};
use crate::Result;

/// Read-side repository for exchange rates and the currency registry.
pub struct FxRepository {
    pool: Arc<DbPool>,
}

impl FxRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FxRepositoryTrait for FxRepository {
    fn get_pair_rates(&self, base: &str, target: &str) -> Result<Vec<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = exchange_rates::table
            .filter(
                exchange_rates::base_currency
                    .eq(base)
                    .and(exchange_rates::target_currency.eq(target))
                    .or(exchange_rates::base_currency
                        .eq(target)
                        .and(exchange_rates::target_currency.eq(base))),
            )
            .order(exchange_rates::rate_date.desc())
            .load::<ExchangeRateDB>(&mut conn)?;

        rows.into_iter()
            .map(|db| Ok(ExchangeRate::try_from(db)?))
            .collect()
    }

    fn get_currency(&self, code: &str) -> Result<Option<Currency>> {
        let mut conn = get_connection(&self.pool)?;

        let currency = currencies::table
            .find(code)
            .first::<Currency>(&mut conn)
            .optional()?;

        Ok(currency)
    }
}
