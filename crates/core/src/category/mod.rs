//! Category directory.
//!
//! - `directory` - reference validation and display enrichment
//! - `style` - color and icon normalization
//! - `service` - category management on the ledger service

pub mod directory;
pub mod service;
pub mod style;

pub use directory::{CategoryDirectory, UNCATEGORIZED};
pub use style::{DEFAULT_COLOR, DEFAULT_ICON, canonicalize};
