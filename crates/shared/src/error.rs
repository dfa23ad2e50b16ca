//! Request-level failures that do not belong to the ledger itself.
//!
//! Domain errors live next to their services; this covers bad input shape, missing sessions and
//! failures in the plumbing around a request.

use thiserror::Error;

/// Message rendered to clients in place of internal failure details.
pub const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Failure raised by the HTTP layer itself.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or unusable session.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed body, query or path.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Anything unexpected; rendered without details.
    #[error("internal failure: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for the response.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Internal(_) => 500,
        }
    }

    /// Stable code rendered in the `error` field.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show a client; internal details stay in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => INTERNAL_MESSAGE.to_string(),
            Self::Unauthorized(msg) | Self::Validation(msg) => msg.clone(),
        }
    }
}
