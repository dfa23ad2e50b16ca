//! Bearer-token guard for the per-user ledger routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;
use crate::error::ApiError;
use coinkeeper_shared::types::UserId;
use coinkeeper_shared::{Claims, JwtError};

/// Why a request never reached a ledger handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Denied {
    Missing,
    Expired,
    Invalid,
}

impl IntoResponse for Denied {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            Self::Missing => (
                "MISSING_TOKEN",
                "Authorization header with Bearer token is required",
            ),
            Self::Expired => ("TOKEN_EXPIRED", "Session has expired, log in again"),
            Self::Invalid => ("INVALID_TOKEN", "Invalid or malformed token"),
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": code, "message": message })),
        )
            .into_response()
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Resolves the session token into [`Claims`] and stashes them in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);

    let claims = match token.map(|t| state.jwt_service.validate_token(t)) {
        None => return Denied::Missing.into_response(),
        Some(Ok(claims)) => claims,
        Some(Err(JwtError::Expired)) => return Denied::Expired.into_response(),
        Some(Err(e)) => {
            tracing::debug!(error = %e, "bearer token refused");
            return Denied::Invalid.into_response();
        }
    };

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// The user whose ledger a request operates on.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.0.user_id()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Claims>() {
            Some(claims) => Ok(Self(claims.clone())),
            None => Err(ApiError::unauthorized("Authentication required")),
        }
    }
}
