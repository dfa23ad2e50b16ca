//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification and strength policy
//! - User registration and login checks

mod password;
mod users;

pub use password::{
    MIN_PASSWORD_LENGTH, PasswordError, check_password_strength, hash_password, verify_password,
};
pub use users::{User, UserError, UserService};
