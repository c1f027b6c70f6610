//! ISO-4217 style currency codes.

use super::error::RatesError;

/// Trims and upper-cases a currency code without validating it.
#[must_use]
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Normalizes a client-supplied code and checks it is three ASCII letters.
///
/// # Errors
///
/// Returns `RatesError::InvalidCurrency` for anything else.
pub fn parse_code(raw: &str) -> Result<String, RatesError> {
    let code = normalize_code(raw);
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(RatesError::InvalidCurrency(raw.trim().to_string()))
    }
}
