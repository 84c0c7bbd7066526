//! Embeddable core library for the estimator.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking
//! into a web backend or other host process.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`ProjectSource`](ports::ProjectSource) - load the project to quote or edit
//! - [`PresetSource`](ports::PresetSource) - look up pricing presets
//! - [`WritePort`](ports::WritePort) - write files and create directories
//!
//! The [`adapters`] module provides default filesystem-backed implementations.
//!
//! # Entry points
//!
//! - [`run_quote`](pipeline::run_quote) - price a project into a quote
//! - [`run_edit`](pipeline::run_edit) - apply item edits to a project

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export the engine's error so callers don't need estimator-domain directly.
pub use estimator_domain::{EditMode, PricingError};
