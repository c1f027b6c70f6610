//! Application-wide error types.
//!
//! Every variant carries the machine-readable `code` clients see in the
//! `error` field of a response body, plus a human-readable message.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input shape or content.
    #[error("Validation error: {message}")]
    Validation {
        /// Client-facing error code.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },

    /// Missing, invalid or expired token, revoked session, bad credentials.
    #[error("Authentication failed: {message}")]
    Unauthorized {
        /// Client-facing error code.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },

    /// Uniqueness violation.
    #[error("Conflict: {message}")]
    Conflict {
        /// Client-facing error code.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Client-facing error code.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },

    /// Data that does not exist yet, e.g. rates before the first refresh.
    #[error("Unavailable: {message}")]
    Unavailable {
        /// Client-facing error code.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },

    /// Upstream rate provider failure.
    #[error("Upstream failure: {message}")]
    Upstream {
        /// Client-facing error code.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },

    /// Internal server error.
    #[error("Internal error: {message}")]
    Internal {
        /// Client-facing error code.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },
}

impl AppError {
    /// Validation failure with the given code.
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    /// Authentication failure with the given code.
    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code,
            message: message.into(),
        }
    }

    /// Uniqueness conflict with the given code.
    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    /// Missing resource with the given code.
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
        }
    }

    /// Data not available yet.
    pub fn unavailable(code: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            code,
            message: message.into(),
        }
    }

    /// Upstream provider failure.
    pub fn upstream(code: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            code,
            message: message.into(),
        }
    }

    /// Internal failure; the message is logged, never sent to clients.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: "internal_error",
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::Upstream { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Internal { .. } => 500,
            Self::Unavailable { .. } => 503,
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Unauthorized { .. } => "auth",
            Self::Conflict { .. } => "conflict",
            Self::NotFound { .. } => "not_found",
            Self::Unavailable { .. } => "unavailable",
            Self::Upstream { .. } => "upstream_failure",
            Self::Internal { .. } => "internal",
        }
    }

    /// Returns the client-facing error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { code, .. }
            | Self::Unauthorized { code, .. }
            | Self::Conflict { code, .. }
            | Self::NotFound { code, .. }
            | Self::Unavailable { code, .. }
            | Self::Upstream { code, .. }
            | Self::Internal { code, .. } => *code,
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::Conflict { message, .. }
            | Self::NotFound { message, .. }
            | Self::Unavailable { message, .. }
            | Self::Upstream { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }
}
