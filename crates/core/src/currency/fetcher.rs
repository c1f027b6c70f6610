//! Rate fetch capability.

use async_trait::async_trait;
use fxgate_shared::{FetchError, FetchedRates, RateProvider};

/// Anything that can produce the latest rates for a base currency.
#[async_trait]
pub trait RateFetcher: Send + Sync {
    /// Name recorded on snapshots produced from this fetcher.
    fn name(&self) -> &str;

    /// Fetches rates quoted against `base`.
    async fn fetch(&self, base: &str) -> Result<FetchedRates, FetchError>;
}

#[async_trait]
impl RateFetcher for RateProvider {
    fn name(&self) -> &str {
        RateProvider::name(self)
    }

    async fn fetch(&self, base: &str) -> Result<FetchedRates, FetchError> {
        RateProvider::fetch(self, base).await
    }
}
