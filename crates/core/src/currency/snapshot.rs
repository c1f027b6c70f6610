//! Rate snapshot records.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use fxgate_shared::types::SnapshotId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::RatesError;

/// Currency code to units per one unit of the snapshot's base.
pub type RateMap = BTreeMap<String, Decimal>;

/// A snapshot about to be appended to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRateSnapshot {
    /// Provider that produced the rates.
    pub provider: String,
    /// Upper-case base currency.
    pub base: String,
    /// Serialized rate map, see [`encode_rates`].
    pub rates_json: String,
    /// Provider-reported as-of time.
    pub fetched_at: DateTime<Utc>,
}

/// A stored, immutable snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// Snapshot ID.
    pub id: SnapshotId,
    /// Provider that produced the rates.
    pub provider: String,
    /// Upper-case base currency.
    pub base: String,
    /// Serialized rate map.
    pub rates_json: String,
    /// Provider-reported as-of time.
    pub fetched_at: DateTime<Utc>,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

impl RateSnapshot {
    /// Decodes the stored rate map.
    ///
    /// Values may be JSON strings or numbers. Entries that are not decimals
    /// are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `RatesError::Encoding` if the payload is not a JSON object.
    pub fn rates(&self) -> Result<RateMap, RatesError> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(&self.rates_json)
            .map_err(|e| RatesError::Encoding(e.to_string()))?;

        let mut rates = RateMap::new();
        for (code, value) in raw {
            let parsed = match &value {
                serde_json::Value::String(s) => Decimal::from_str(s).ok(),
                serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
                    .or_else(|_| Decimal::from_scientific(&n.to_string()))
                    .ok(),
                _ => None,
            };
            match parsed {
                Some(rate) => {
                    rates.insert(code.to_ascii_uppercase(), rate);
                }
                None => {
                    warn!(snapshot_id = %self.id, currency = %code, %value, "Skipping unreadable rate");
                }
            }
        }
        Ok(rates)
    }
}

/// Serializes a rate map as a JSON object of decimal strings.
///
/// # Errors
///
/// Returns `RatesError::Encoding` if serialization fails.
pub fn encode_rates(rates: &RateMap) -> Result<String, RatesError> {
    let as_text: BTreeMap<&str, String> = rates
        .iter()
        .map(|(code, rate)| (code.as_str(), rate.to_string()))
        .collect();
    serde_json::to_string(&as_text).map_err(|e| RatesError::Encoding(e.to_string()))
}
