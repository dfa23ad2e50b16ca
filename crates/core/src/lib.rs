//! Core business logic for Coinkeeper.
//!
//! This crate contains pure business logic with ZERO web or file dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Accounts, transactions, and balance reconciliation
//! - `category` - Category lookups, normalization, and management
//! - `stats` - Period statistics and dashboard aggregation
//! - `auth` - Password hashing and user registration

pub mod auth;
pub mod category;
pub mod ledger;
pub mod stats;
