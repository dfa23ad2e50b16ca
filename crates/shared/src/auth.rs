//! Session claims and the request/response bodies of the auth endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Payload of a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owner of the ledger the session may touch.
    pub sub: UserId,
    /// Email the session was issued to.
    pub email: String,
    /// Issued at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

impl Claims {
    /// Claims issued now and lapsing at `expires_at`.
    #[must_use]
    pub fn new(user_id: UserId, email: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id,
            email: email.to_owned(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.sub
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`. The email is trimmed and lowercased before use.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: UserId,
    /// As stored, after normalization.
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for the ledger routes.
    pub token: String,
    pub user_id: UserId,
    pub email: String,
    /// Seconds until `token` lapses.
    pub expires_in: i64,
}
