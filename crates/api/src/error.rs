//! Mapping from domain errors to HTTP responses.
//!
//! Every failure renders as `{"error": CODE, "message": text}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use coinkeeper_core::auth::UserError;
use coinkeeper_core::ledger::LedgerError;
use coinkeeper_shared::AppError;
use coinkeeper_shared::error::INTERNAL_MESSAGE;

/// Any error a handler can return.
#[derive(Debug)]
pub enum ApiError {
    /// Ledger, category, or statistics failure.
    Ledger(LedgerError),
    /// Registration or login failure.
    User(UserError),
    /// Request-level failure.
    App(AppError),
}

impl ApiError {
    /// Shorthand for a 400 response.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::App(AppError::Validation(message.into()))
    }

    /// Shorthand for a 401 response.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::App(AppError::Unauthorized(message.into()))
    }

    fn parts(&self) -> (u16, &'static str, String) {
        match self {
            Self::Ledger(e) => (e.http_status_code(), e.error_code(), e.public_message()),
            Self::User(e) => {
                let status = e.http_status_code();
                let message = if status >= 500 {
                    INTERNAL_MESSAGE.to_string()
                } else {
                    e.to_string()
                };
                (status, e.error_code(), message)
            }
            Self::App(e) => (e.status_code(), e.error_code(), e.public_message()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ledger(e) => e.fmt(f),
            Self::User(e) => e.fmt(f),
            Self::App(e) => e.fmt(f),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status >= 500 {
            error!(error = %self, code, "Request failed");
        }
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        Self::User(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}
