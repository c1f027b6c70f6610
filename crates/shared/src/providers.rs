//! Upstream exchange-rate providers.
//!
//! The set of providers is closed: a configuration value picks one of the
//! [`ProviderKind`] variants once at startup. Both upstreams answer
//! `GET {base_url}/latest?base=CODE` with a `date` and a `rates` object.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Rates returned by one upstream fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedRates {
    /// Currency code to units per one unit of the base currency.
    pub rates: BTreeMap<String, Decimal>,
    /// Provider-reported as-of time.
    pub as_of: DateTime<Utc>,
}

/// Errors that can occur while fetching rates.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport or body decoding failure.
    #[error("rate provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("{provider} status {status}")]
    Status {
        /// Provider name.
        provider: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// Upstream answered 200 but flagged the request as unsuccessful.
    #[error("{0} rejected the request")]
    Rejected(&'static str),

    /// A rate could not be read as an exact decimal.
    #[error("invalid rate for {currency}: {value}")]
    InvalidRate {
        /// Currency code.
        currency: String,
        /// Raw value as sent by the provider.
        value: String,
    },
}

/// Supported upstreams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// <https://frankfurter.dev>
    Frankfurter,
    /// <https://exchangerate.host>
    ExchangerateHost,
}

impl ProviderKind {
    /// Resolves a configured provider name; unknown names fall back to Frankfurter.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "frankfurter" => Self::Frankfurter,
            "exchangeratehost" => Self::ExchangerateHost,
            other => {
                warn!(provider = %other, "Unknown rates provider, falling back to frankfurter");
                Self::Frankfurter
            }
        }
    }

    /// Name recorded on every snapshot fetched through this provider.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Frankfurter => "frankfurter",
            Self::ExchangerateHost => "exchangeratehost",
        }
    }

    /// Public endpoint of the provider.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Frankfurter => "https://api.frankfurter.dev/v1",
            Self::ExchangerateHost => "https://api.exchangerate.host",
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestPayload {
    success: Option<bool>,
    date: Option<String>,
    #[serde(default)]
    rates: BTreeMap<String, serde_json::Number>,
}

/// HTTP client bound to one upstream.
#[derive(Debug, Clone)]
pub struct RateProvider {
    kind: ProviderKind,
    base_url: String,
    client: reqwest::Client,
}

impl RateProvider {
    /// Builds a provider with a bounded request timeout.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be built.
    pub fn new(
        kind: ProviderKind,
        timeout: Duration,
        base_url: Option<&str>,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fxgate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            kind,
            base_url: base_url
                .unwrap_or(kind.default_base_url())
                .trim_end_matches('/')
                .to_string(),
            client,
        })
    }

    /// Provider kind.
    #[must_use]
    pub const fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Provider name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Fetches the latest rates quoted against `base`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-200 status, an explicit
    /// upstream rejection, or a rate that is not a finite decimal.
    #[instrument(name = "RateFetch", skip(self), fields(provider = self.name()))]
    pub async fn fetch(&self, base: &str) -> Result<FetchedRates, FetchError> {
        let url = format!("{}/latest", self.base_url);
        debug!(%url, "Requesting latest rates");

        let response = self.client.get(&url).query(&[("base", base)]).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                provider: self.name(),
                status: response.status().as_u16(),
            });
        }

        let payload = response.json::<LatestPayload>().await?;
        if payload.success == Some(false) {
            return Err(FetchError::Rejected(self.name()));
        }

        let rates = payload
            .rates
            .into_iter()
            .map(|(currency, value)| {
                let rate = parse_rate(&value).ok_or_else(|| FetchError::InvalidRate {
                    currency: currency.clone(),
                    value: value.to_string(),
                })?;
                Ok((currency.to_uppercase(), rate))
            })
            .collect::<Result<BTreeMap<_, _>, FetchError>>()?;

        let as_of = payload
            .date
            .as_deref()
            .and_then(parse_as_of)
            .unwrap_or_else(Utc::now);

        debug!(count = rates.len(), %as_of, "Fetched rates");
        Ok(FetchedRates { rates, as_of })
    }
}

/// Reads a JSON number through the text it arrived as.
///
/// `serde_json` is built with `arbitrary_precision`, so `Number` keeps the
/// upstream digits instead of an `f64`.
fn parse_rate(value: &serde_json::Number) -> Option<Decimal> {
    let text = value.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn parse_as_of(date: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
