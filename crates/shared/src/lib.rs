//! Shared types, errors, and configuration for Coinkeeper.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with decimal precision
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - JWT issuance and validation

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use config::AppConfig;
pub use error::AppError;
pub use auth::Claims;
pub use jwt::{JwtConfig, JwtError, JwtService};
