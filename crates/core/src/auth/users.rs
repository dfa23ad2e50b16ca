//! User registration and credential checks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;
use coinkeeper_shared::types::UserId;

use super::password::{PasswordError, check_password_strength, hash_password, verify_password};
use crate::ledger::store::{StoreError, UserStore};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Lowercased email.
    pub email: String,
    /// Argon2id PHC hash.
    pub password_hash: String,
    /// Registration time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Registration and login failures.
#[derive(Debug, Error)]
pub enum UserError {
    /// Email is not shaped like `local@domain`.
    #[error("A valid email is required")]
    InvalidEmail,

    /// Password does not meet the policy.
    #[error(transparent)]
    WeakPassword(PasswordError),

    /// Email is already registered.
    #[error("A user with this email already exists")]
    EmailTaken,

    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Hashing failed.
    #[error(transparent)]
    Password(PasswordError),

    /// The user store failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl UserError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidEmail | Self::WeakPassword(_) => "VALIDATION_ERROR",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Password(_) | Self::Storage(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidEmail | Self::WeakPassword(_) => 400,
            Self::EmailTaken => 409,
            Self::InvalidCredentials => 401,
            Self::Password(_) | Self::Storage(_) => 500,
        }
    }
}

fn normalize_email(raw: &str) -> Result<String, UserError> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(email)
        }
        _ => Err(UserError::InvalidEmail),
    }
}

/// Registers users and checks their credentials.
#[derive(Debug)]
pub struct UserService<S> {
    store: Arc<S>,
    write_lock: Mutex<()>,
}

impl<S: UserStore> UserService<S> {
    /// Creates a new user service.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Registers a new user. Emails are unique ignoring case.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, UserError> {
        let email = normalize_email(email)?;
        check_password_strength(password).map_err(UserError::WeakPassword)?;

        let _guard = self.write_lock.lock().await;
        let mut users = self.store.load_users().await?;
        if users.iter().any(|u| u.email == email) {
            return Err(UserError::EmailTaken);
        }

        let user = User {
            id: UserId::new(),
            email,
            password_hash: hash_password(password).map_err(UserError::Password)?,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        self.store.save_users(&users).await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Returns the user if the email and password match.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let email = email.trim().to_lowercase();
        let users = self.store.load_users().await?;
        let user = users
            .into_iter()
            .find(|u| u.email == email)
            .ok_or(UserError::InvalidCredentials)?;

        // A corrupt stored hash reads as a failed login, not a server error.
        match verify_password(password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) | Err(PasswordError::InvalidHash) => Err(UserError::InvalidCredentials),
            Err(e) => Err(UserError::Password(e)),
        }
    }
}
