//! Authentication routes for register, login and logout.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use fxgate_shared::auth::{AccessToken, LoginRequest, RegisterRequest, UserInfo};

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Creates the auth routes that need a live session.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/logout", post(logout))
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserInfo>), ApiError> {
    let Json(payload) = body?;
    let user = state
        .auth
        .register(&payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserInfo {
            id: user.id,
            email: user.email,
        }),
    ))
}

/// POST /auth/login - Authenticate and open a new session.
///
/// Any earlier session of the user stops working.
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AccessToken>, ApiError> {
    let Json(payload) = body?;
    let token = state.auth.login(&payload.email, &payload.password).await?;
    Ok(Json(token))
}

/// POST /auth/logout - Revoke the caller's session.
async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    state.auth.logout(auth.context()).await?;
    Ok(StatusCode::NO_CONTENT)
}
