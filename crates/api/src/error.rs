//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": "<code>", "message": "<text>"}`
//! with the status of the underlying [`AppError`].

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fxgate_core::auth::AuthError;
use fxgate_core::currency::RatesError;
use fxgate_shared::AppError;
use serde::Serialize;
use tracing::error;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable code.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// An [`AppError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<RatesError> for ApiError {
    fn from(err: RatesError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::validation("bad_request", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(AppError::validation("bad_request", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.kind() == "internal" {
            error!(code = self.0.error_code(), error = %self.0.message(), "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.0.message().to_string()
        };

        let body = ErrorBody {
            error: self.0.error_code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
