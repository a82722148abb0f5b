//! Test helpers shared across the workspace.
//!
//! Provides environment variable guards, temporary configuration
//! directories and a `figment::Jail` wrapper for tests that depend on the
//! working directory.

pub mod env;
pub mod fs;
pub mod jail;
