use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use rust_decimal::Decimal;

use super::currency_converter::CurrencyConverter;
use super::fx_model::Currency;
use super::fx_traits::{FxRepositoryTrait, FxServiceTrait};
use crate::Result;

/// Service converting minor-unit amounts between currencies using stored
/// rates.
pub struct FxService {
    repository: Arc<dyn FxRepositoryTrait>,
}

impl FxService {
    pub fn new(repository: Arc<dyn FxRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    fn convert(&self, amount: i64, from: &str, to: &str, source: Option<&str>) -> Result<i64> {
        if from == to {
            return Ok(amount);
        }

        let rates = self.repository.get_pair_rates(from, to)?;
        let converter = CurrencyConverter::new(rates);
        let rate = converter.resolve_rate(from, to, source)?;

        let from_currency = self.get_currency(from)?;
        let to_currency = self.get_currency(to)?;

        Ok(CurrencyConverter::convert_minor(
            amount,
            rate,
            &from_currency,
            &to_currency,
        )?)
    }

    fn latest_rate(&self, from: &str, to: &str) -> Result<Decimal> {
        let rates = self.repository.get_pair_rates(from, to)?;
        let converter = CurrencyConverter::new(rates);
        Ok(converter.resolve_rate(from, to, None)?)
    }

    fn get_currency(&self, code: &str) -> Result<Currency> {
        match self.repository.get_currency(code)? {
            Some(currency) => Ok(currency),
            None => {
                warn!(
                    "Currency {} missing from registry, assuming 2 decimal places",
                    code
                );
                Ok(Currency::with_default_precision(code))
            }
        }
    }
}
