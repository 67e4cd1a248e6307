use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};

use super::fx_errors::FxError;
use super::fx_model::{Currency, ExchangeRate};

/// Resolves a conversion rate for one currency pair from stored rate rows
/// and applies it to integer minor-unit amounts.
///
/// Rate resolution order:
/// 1. the most recent rate for the exact pair carrying the requested source
///    tag, when one is requested;
/// 2. the most recent rate for the exact pair, any source;
/// 3. the inverse (`1/rate`) of the most recent rate stored for the reverse
///    pair;
/// 4. otherwise `FxError::RateNotFound`.
pub struct CurrencyConverter {
    rates: Vec<ExchangeRate>,
}

impl CurrencyConverter {
    /// Builds a converter over the stored rates touching one pair (both
    /// orientations).
    pub fn new(rates: Vec<ExchangeRate>) -> Self {
        CurrencyConverter { rates }
    }

    fn most_recent<'a>(
        &'a self,
        base: &str,
        target: &str,
        source: Option<&str>,
    ) -> Option<&'a ExchangeRate> {
        self.rates
            .iter()
            .filter(|r| r.base_currency == base && r.target_currency == target)
            .filter(|r| source.map_or(true, |s| r.source == s))
            .max_by_key(|r| (r.rate_date, r.created_at))
    }

    /// Resolves the effective `from -> to` rate per the priority order above.
    pub fn resolve_rate(
        &self,
        from: &str,
        to: &str,
        source: Option<&str>,
    ) -> Result<Decimal, FxError> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        if let Some(tag) = source {
            if let Some(rate) = self.most_recent(from, to, Some(tag)) {
                return Ok(rate.rate);
            }
        }

        if let Some(rate) = self.most_recent(from, to, None) {
            return Ok(rate.rate);
        }

        if let Some(inverse) = self.most_recent(to, from, None) {
            if inverse.rate.is_zero() {
                return Err(FxError::InvalidRate(format!(
                    "Stored rate {}->{} is zero and cannot be inverted",
                    to, from
                )));
            }
            return Ok(Decimal::ONE / inverse.rate);
        }

        Err(FxError::RateNotFound(format!("{}/{}", from, to)))
    }

    /// Converts a positive minor-unit amount of `from` into minor units of
    /// `to` at `rate`.
    ///
    /// Equivalent to `round(major_amount * rate, to.decimal_places)` in
    /// major units; the rounding mode is pinned to round-half-up
    /// (midpoint away from zero) and part of the crate's contract.
    pub fn convert_minor(
        amount: i64,
        rate: Decimal,
        from: &Currency,
        to: &Currency,
    ) -> Result<i64, FxError> {
        let scale = i64::from(to.decimal_places - from.decimal_places);
        let converted = Decimal::from(amount) * rate * Decimal::TEN.powi(scale);
        converted
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(|| {
                FxError::ConversionError(format!(
                    "{} {} at rate {} overflows {} minor units",
                    amount, from.code, rate, to.code
                ))
            })
    }
}
