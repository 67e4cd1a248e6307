use async_trait::async_trait;
use rust_decimal::Decimal;

use super::fx_model::{Currency, ExchangeRate};
use crate::errors::Result;

/// Trait for exchange-rate persistence (read side).
#[async_trait]
pub trait FxRepositoryTrait: Send + Sync {
    /// Returns all stored rates touching the pair, in both orientations.
    fn get_pair_rates(&self, base: &str, target: &str) -> Result<Vec<ExchangeRate>>;
    fn get_currency(&self, code: &str) -> Result<Option<Currency>>;
}

/// Trait for currency conversion operations.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Converts a minor-unit amount between currencies using the freshest
    /// stored rate, preferring rates tagged with `source` when given.
    fn convert(&self, amount: i64, from: &str, to: &str, source: Option<&str>) -> Result<i64>;

    /// Resolves the effective rate without applying it.
    fn latest_rate(&self, from: &str, to: &str) -> Result<Decimal>;

    /// Looks up a currency's registry entry, falling back to a two-decimal
    /// default for unknown codes.
    fn get_currency(&self, code: &str) -> Result<Currency>;
}
