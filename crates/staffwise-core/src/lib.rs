//! staffwise-core: shared types, IDs, errors, and configuration.
//!
//! This crate is the foundational dependency for the other staffwise
//! crates, providing typed surrogate identifiers, the staffing-domain
//! enums, a unified error type, and application configuration.

pub mod config;
pub mod error;
pub mod ids;
pub mod staffing;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
pub use staffing::*;
