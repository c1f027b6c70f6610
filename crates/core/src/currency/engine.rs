//! Conversion engine.
//!
//! Keeps rate snapshots fresh and answers conversion queries from the most
//! recently inserted snapshot per base. There is no cache: every read goes to
//! the store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::code::normalize_code;
use super::conversion::triangulate;
use super::error::RatesError;
use super::fetcher::RateFetcher;
use super::snapshot::{NewRateSnapshot, RateMap, RateSnapshot, encode_rates};
use super::store::RateSnapshotStore;

/// Decoded contents of the latest snapshot for a base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestRates {
    /// Upper-case base currency.
    pub base: String,
    /// Provider that produced the rates.
    pub provider: String,
    /// Provider-reported as-of time.
    pub fetched_at: DateTime<Utc>,
    /// Currency code to units per one unit of `base`.
    pub rates: RateMap,
}

/// Refreshes, reads and converts exchange rates.
pub struct ConversionEngine {
    fetcher: Arc<dyn RateFetcher>,
    store: Arc<dyn RateSnapshotStore>,
}

impl std::fmt::Debug for ConversionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionEngine")
            .field("provider", &self.fetcher.name())
            .finish_non_exhaustive()
    }
}

impl ConversionEngine {
    /// Creates an engine over a fetcher and a snapshot store.
    #[must_use]
    pub fn new(fetcher: Arc<dyn RateFetcher>, store: Arc<dyn RateSnapshotStore>) -> Self {
        Self { fetcher, store }
    }

    /// Name of the active provider.
    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.fetcher.name()
    }

    /// Fetches rates for `base` and appends them as a new snapshot.
    ///
    /// Nothing is written when the fetch fails.
    ///
    /// # Errors
    ///
    /// - `RatesError::Fetch` if the upstream fetch fails
    /// - `RatesError::Store` if the snapshot cannot be written
    #[instrument(skip(self), fields(provider = self.fetcher.name()))]
    pub async fn refresh(&self, base: &str) -> Result<RateSnapshot, RatesError> {
        let base = normalize_code(base);
        let fetched = match self.fetcher.fetch(&base).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(base = %base, error = %e, "Rate fetch failed");
                return Err(e.into());
            }
        };

        let snapshot = NewRateSnapshot {
            provider: self.fetcher.name().to_string(),
            base,
            rates_json: encode_rates(&fetched.rates)?,
            fetched_at: fetched.as_of,
        };
        let stored = self.store.insert(snapshot).await?;

        info!(
            snapshot_id = %stored.id,
            base = %stored.base,
            count = fetched.rates.len(),
            fetched_at = %stored.fetched_at,
            "Stored rate snapshot"
        );
        Ok(stored)
    }

    /// Reads the most recent snapshot for `base`.
    ///
    /// # Errors
    ///
    /// - `RatesError::RatesUnavailable` if no snapshot exists for the base
    /// - `RatesError::Store` / `RatesError::Encoding` on storage failures
    pub async fn latest(&self, base: &str) -> Result<LatestRates, RatesError> {
        let base = normalize_code(base);
        let snapshot = self
            .store
            .find_latest(&base)
            .await?
            .ok_or_else(|| RatesError::RatesUnavailable(base.clone()))?;

        Ok(LatestRates {
            rates: snapshot.rates()?,
            base: snapshot.base,
            provider: snapshot.provider,
            fetched_at: snapshot.fetched_at,
        })
    }

    /// Converts `amount` from `from` to `to` using the latest `base` snapshot.
    ///
    /// Equal codes short-circuit without touching the store. The result keeps
    /// full precision; round it with
    /// [`round_for_display`](super::conversion::round_for_display).
    ///
    /// # Errors
    ///
    /// - `RatesError::RatesUnavailable` if no snapshot exists for the base
    /// - the `Unknown*Currency` variants when a needed rate is missing
    /// - `RatesError::ZeroRate` / `RatesError::Overflow` on arithmetic failure
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
        base: &str,
    ) -> Result<Decimal, RatesError> {
        let from = normalize_code(from);
        let to = normalize_code(to);
        if from == to {
            return Ok(amount);
        }

        let latest = self.latest(base).await?;
        let converted = triangulate(amount, &from, &to, &latest.base, &latest.rates)?;
        debug!(%amount, %from, %to, base = %latest.base, %converted, "Converted amount");
        Ok(converted)
    }
}
