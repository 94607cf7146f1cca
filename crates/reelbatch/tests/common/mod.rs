//! Shared test utilities for reelbatch integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs with their own source, state and output
//! - Builders and scripted collaborators for shaping a run's behavior

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
