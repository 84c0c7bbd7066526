//! Shared DTOs (schemas-as-code) for the estimator workspace.
//!
//! # Design constraints
//! - These types are read from and written to JSON on disk.
//! - Field names are camelCase so stored projects stay compatible.
//! - Prefer adding optional fields over changing semantics.

pub mod estimate;
pub mod item;
pub mod pricing;
pub mod quote;

/// Schema identifiers.
pub mod schema {
    pub const ESTIMATOR_QUOTE_V1: &str = "estimator.quote.v1";
    pub const ESTIMATOR_PROJECT_V1: &str = "estimator.project.v1";
}
