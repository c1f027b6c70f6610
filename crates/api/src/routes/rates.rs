//! Exchange rate and conversion routes.

use std::collections::{BTreeMap, BTreeSet};

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use fxgate_core::currency::{RatesError, format_fixed, normalize_code, parse_amount, parse_code};
use fxgate_shared::AppError;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the rate routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/rates", get(get_rates))
        .route("/api/convert", post(convert))
        .route("/api/admin/refresh-rates", post(refresh_rates))
}

/// Query parameters for the latest rates.
#[derive(Debug, Default, Deserialize)]
pub struct RatesQuery {
    /// Base currency, defaults to the configured base.
    pub base: Option<String>,
    /// Comma-separated currency filter.
    pub symbols: Option<String>,
}

/// Latest rates for a base.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesResponse {
    /// Upper-case base currency.
    pub base: String,
    /// Provider-reported as-of time.
    pub fetched_at: DateTime<Utc>,
    /// Currency code to decimal-string rate.
    pub rates: BTreeMap<String, String>,
}

/// Request body for a conversion.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    /// Decimal string.
    pub amount: String,
    /// Source currency.
    pub from: String,
    /// Target currency.
    pub to: String,
    /// Base whose snapshot is used, defaults to the configured base.
    #[serde(default)]
    pub base: Option<String>,
}

/// Result of a conversion.
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    /// Amount as submitted.
    pub amount: String,
    /// Upper-case source currency.
    pub from: String,
    /// Upper-case target currency.
    pub to: String,
    /// Upper-case base currency.
    pub base: String,
    /// Converted amount with exactly six fractional digits.
    pub converted: String,
}

/// Request body for a manual refresh.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    /// Base to refresh, defaults to the configured base.
    #[serde(default)]
    pub base: Option<String>,
}

/// GET /api/rates - Latest stored rates for a base.
async fn get_rates(
    State(state): State<AppState>,
    query: Result<Query<RatesQuery>, QueryRejection>,
) -> Result<Json<RatesResponse>, ApiError> {
    let Query(query) = query?;
    let base = resolve_base(query.base.as_deref(), &state.default_base)?;
    let latest = state.rates.latest(&base).await?;

    let wanted = query.symbols.as_deref().map(parse_symbols);
    let rates = latest
        .rates
        .into_iter()
        .filter(|(code, _)| wanted.as_ref().is_none_or(|set| set.contains(code)))
        .map(|(code, rate)| (code, rate.to_string()))
        .collect();

    Ok(Json(RatesResponse {
        base: latest.base,
        fetched_at: latest.fetched_at,
        rates,
    }))
}

/// POST /api/convert - Convert an amount through the latest snapshot.
async fn convert(
    State(state): State<AppState>,
    body: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let Json(request) = body?;

    let amount = parse_amount(&request.amount)?;
    let base = resolve_base(request.base.as_deref(), &state.default_base)?;
    let from = parse_code(&request.from)?;
    let to = parse_code(&request.to)?;

    let converted = state
        .rates
        .convert(amount, &from, &to, &base)
        .await
        .map_err(conversion_error)?;

    Ok(Json(ConvertResponse {
        amount: request.amount.trim().to_string(),
        from,
        to,
        base,
        converted: format_fixed(converted),
    }))
}

/// POST /api/admin/refresh-rates - Fetch and store a new snapshot now.
async fn refresh_rates(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;
    let base = resolve_base(request.base.as_deref(), &state.default_base)?;

    let snapshot = state.rates.refresh(&base).await?;
    info!(
        user_id = %auth.user_id(),
        snapshot_id = %snapshot.id,
        base = %snapshot.base,
        "Manual rate refresh"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Validates a requested base or falls back to the default.
fn resolve_base(requested: Option<&str>, default: &str) -> Result<String, RatesError> {
    match requested.map(str::trim).filter(|b| !b.is_empty()) {
        Some(base) => parse_code(base),
        None => Ok(normalize_code(default)),
    }
}

/// Splits a `symbols` filter into normalized codes.
fn parse_symbols(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(normalize_code)
        .filter(|code| !code.is_empty())
        .collect()
}

/// Conversion failures are all client errors, a missing snapshot included.
fn conversion_error(err: RatesError) -> ApiError {
    match err {
        RatesError::RatesUnavailable(_) => {
            ApiError(AppError::validation(err.error_code(), err.to_string()))
        }
        other => other.into(),
    }
}
