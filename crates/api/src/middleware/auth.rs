//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use fxgate_core::auth::{AuthContext, AuthError};
use tracing::debug;

use crate::{AppState, error::ApiError};

/// Authentication middleware that enforces a live, session-bound token.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Verifies its signature, algorithm and expiry
/// 3. Checks that the session it names is still the user's current session
/// 4. Stores the [`AuthContext`] in request extensions for handlers to access
///
/// Every failure is a 401; the error code tells which stage rejected it.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    match state.auth.authorize(header.as_deref()).await {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, path = %request.uri().path(), "Rejected request");
            ApiError::from(e).into_response()
        }
    }
}

/// Extractor for the authenticated caller.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let user_id = auth.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub AuthContext);

impl AuthUser {
    /// Returns the authenticated user's ID.
    #[must_use]
    pub const fn user_id(&self) -> fxgate_shared::types::UserId {
        self.0.user_id
    }

    /// Returns the session the request's token is bound to.
    #[must_use]
    pub const fn session_id(&self) -> fxgate_shared::types::SessionId {
        self.0.session_id
    }

    /// Returns the inner context.
    #[must_use]
    pub const fn context(&self) -> AuthContext {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| AuthError::MissingToken.into())
    }
}
