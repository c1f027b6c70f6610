//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Session authentication middleware
//! - JSON error responses

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use fxgate_core::auth::SessionAuthenticator;
use fxgate_core::currency::ConversionEngine;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Token and session checks, login and registration.
    pub auth: Arc<SessionAuthenticator>,
    /// Rate snapshots and conversion.
    pub rates: Arc<ConversionEngine>,
    /// Base currency used when a request names none.
    pub default_base: Arc<str>,
}

impl AppState {
    /// Bundles the services handlers need.
    #[must_use]
    pub fn new(
        auth: Arc<SessionAuthenticator>,
        rates: Arc<ConversionEngine>,
        default_base: &str,
    ) -> Self {
        Self {
            auth,
            rates,
            default_base: Arc::from(default_base),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
