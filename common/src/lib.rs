//! Common utilities shared across the FraudShield workspace
//!
//! This crate provides functionality used by both the scoring engine and the
//! deployable binaries:
//!
//! - Configuration file model and loading
//! - YAML `!include` assembly used by the build scripts
//! - Shared test helpers (behind the `test-helpers` feature)

pub mod config;
pub mod yaml_include;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{generate_unique_id, temp_store_dir};
