//! Test utilities and fixtures for the fund ratio workspace
//!
//! This module provides:
//! - Scriptable collaborator mocks with call counters
//! - Price series and fund record factories
//! - rstest fixtures for the common scenarios
//! - Logging, timeout and service construction helpers

pub mod fixtures;
pub mod factories;
pub mod mocks;
pub mod helpers;

pub use fixtures::*;
pub use factories::*;
pub use mocks::*;
pub use helpers::*;
pub use assertions::*;
