//! Currency conversion math.
//!
//! CRITICAL: Precision rules for conversion:
//! - Never use floats, every rate and amount is a `Decimal`
//! - Multiply before dividing to keep intermediate precision
//! - Round only at the display boundary, with banker's rounding (round half to even)

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::RatesError;
use super::snapshot::RateMap;

/// Fractional digits shown for converted amounts.
pub const DISPLAY_SCALE: u32 = 6;

/// Converts `amount` from `from` to `to` through a rate map quoted against `base`.
///
/// Codes must already be normalized. The result keeps full precision.
///
/// # Errors
///
/// - `RatesError::UnknownTargetCurrency` / `UnknownSourceCurrency` / `UnknownCurrency`
///   when a needed rate is missing
/// - `RatesError::ZeroRate` when dividing by a zero rate
/// - `RatesError::Overflow` when the result does not fit
pub fn triangulate(
    amount: Decimal,
    from: &str,
    to: &str,
    base: &str,
    rates: &RateMap,
) -> Result<Decimal, RatesError> {
    if from == to {
        return Ok(amount);
    }

    if from == base {
        let rate = rates
            .get(to)
            .ok_or_else(|| RatesError::UnknownTargetCurrency(to.to_string()))?;
        return amount.checked_mul(*rate).ok_or(RatesError::Overflow);
    }

    if to == base {
        let rate = rates
            .get(from)
            .ok_or_else(|| RatesError::UnknownSourceCurrency(from.to_string()))?;
        return divide(amount, *rate, from);
    }

    match (rates.get(from), rates.get(to)) {
        (Some(rate_from), Some(rate_to)) => {
            let scaled = amount.checked_mul(*rate_to).ok_or(RatesError::Overflow)?;
            divide(scaled, *rate_from, from)
        }
        (rate_from, rate_to) => {
            let mut missing = Vec::with_capacity(2);
            if rate_from.is_none() {
                missing.push(from.to_string());
            }
            if rate_to.is_none() {
                missing.push(to.to_string());
            }
            Err(RatesError::UnknownCurrency(missing))
        }
    }
}

fn divide(numerator: Decimal, rate: Decimal, code: &str) -> Result<Decimal, RatesError> {
    if rate.is_zero() {
        return Err(RatesError::ZeroRate(code.to_string()));
    }
    numerator.checked_div(rate).ok_or(RatesError::Overflow)
}

/// Rounds to [`DISPLAY_SCALE`] digits using banker's rounding.
#[must_use]
pub fn round_for_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Rounds for display and renders exactly [`DISPLAY_SCALE`] fractional digits.
#[must_use]
pub fn format_fixed(value: Decimal) -> String {
    let mut rounded = round_for_display(value);
    rounded.rescale(DISPLAY_SCALE);
    rounded.to_string()
}

/// Parses a client-supplied decimal amount.
///
/// # Errors
///
/// Returns `RatesError::InvalidAmount` if the text is not a plain decimal.
pub fn parse_amount(raw: &str) -> Result<Decimal, RatesError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed).map_err(|_| RatesError::InvalidAmount(trimmed.to_string()))
}
