//! Conversion engine errors.

use fxgate_shared::{AppError, FetchError};
use thiserror::Error;

use crate::store::StoreError;

/// Errors raised while refreshing, reading or converting rates.
#[derive(Debug, Error)]
pub enum RatesError {
    /// No snapshot has been stored for the base yet.
    #[error("no rates available for base {0}")]
    RatesUnavailable(String),

    /// `from` is the base and `to` is missing from the snapshot.
    #[error("unknown target currency: {0}")]
    UnknownTargetCurrency(String),

    /// `to` is the base and `from` is missing from the snapshot.
    #[error("unknown source currency: {0}")]
    UnknownSourceCurrency(String),

    /// Cross conversion with one or both codes missing from the snapshot.
    #[error("unknown currency: {}", .0.join(", "))]
    UnknownCurrency(Vec<String>),

    /// A client-supplied code is not three ASCII letters.
    #[error("invalid currency code: {0:?}")]
    InvalidCurrency(String),

    /// A client-supplied amount is not a decimal number.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// A stored rate is zero and cannot be divided by.
    #[error("rate for {0} is zero")]
    ZeroRate(String),

    /// The result does not fit the decimal type.
    #[error("conversion overflowed")]
    Overflow,

    /// The upstream fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The snapshot store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A rate map could not be serialized.
    #[error("rate map encoding failed: {0}")]
    Encoding(String),
}

impl RatesError {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::RatesUnavailable(_) => "rates_unavailable",
            Self::UnknownTargetCurrency(_) => "unknown_target_currency",
            Self::UnknownSourceCurrency(_) => "unknown_source_currency",
            Self::UnknownCurrency(_) => "unknown_currency",
            Self::InvalidCurrency(_) => "invalid_currency",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::ZeroRate(_) => "invalid_rate",
            Self::Overflow => "conversion_overflow",
            Self::Fetch(_) => "upstream_failure",
            Self::Store(_) | Self::Encoding(_) => "internal_error",
        }
    }
}

impl From<RatesError> for AppError {
    fn from(err: RatesError) -> Self {
        let code = err.error_code();
        match err {
            RatesError::RatesUnavailable(_) => Self::unavailable(code, err.to_string()),
            RatesError::UnknownTargetCurrency(_)
            | RatesError::UnknownSourceCurrency(_)
            | RatesError::UnknownCurrency(_)
            | RatesError::InvalidCurrency(_)
            | RatesError::InvalidAmount(_)
            | RatesError::Overflow => Self::validation(code, err.to_string()),
            RatesError::Fetch(_) => Self::upstream(code, err.to_string()),
            RatesError::ZeroRate(_) | RatesError::Store(_) | RatesError::Encoding(_) => {
                Self::internal(err.to_string())
            }
        }
    }
}
