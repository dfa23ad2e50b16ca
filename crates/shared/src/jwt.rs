//! Session tokens for the HTTP API.
//!
//! A login yields one HS256 token whose subject is the user's id. There are no refresh tokens: a
//! client logs in again once the token lapses.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::Claims;
use crate::config::JwtSettings;
use crate::types::UserId;

/// Signing secret and session lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret.
    pub secret: String,
    /// Session lifetime in minutes.
    pub access_token_expires_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "coinkeeper-dev-secret".to_string(),
            access_token_expires_minutes: 24 * 60,
        }
    }
}

impl From<&JwtSettings> for JwtConfig {
    fn from(settings: &JwtSettings) -> Self {
        Self {
            secret: settings.secret.clone(),
            access_token_expires_minutes: settings.access_token_expires_minutes,
        }
    }
}

/// Why a session token could not be issued or accepted.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Signing failed.
    #[error("could not sign session token: {0}")]
    EncodingError(String),

    #[error("session token rejected: {0}")]
    /// Bad signature, malformed token or missing claims.
    DecodingError(String),

    /// The `exp` claim is in the past.
    #[error("session token has expired")]
    Expired,
}

/// Signs and checks session tokens.
#[derive(Clone)]
pub struct JwtService {
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("ttl_minutes", &self.ttl.num_minutes())
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Builds the signing and checking keys from `config`.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            ttl: Duration::minutes(config.access_token_expires_minutes),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Signs a session token for `user_id`, valid for the configured lifetime from now.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if signing fails.
    pub fn generate_access_token(&self, user_id: UserId, email: &str) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, email, Utc::now() + self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Checks the signature and expiry of a session token and returns its claims.
    ///
    /// # Errors
    ///
    /// `JwtError::Expired` once the token lapsed, `JwtError::DecodingError` for anything
    /// malformed or signed with another secret.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(JwtError::Expired),
            Err(e) => Err(JwtError::DecodingError(e.to_string())),
        }
    }

    /// Session lifetime in seconds, as reported to clients at login.
    #[must_use]
    pub fn access_token_expires_in(&self) -> i64 {
        self.ttl.num_seconds()
    }
}
