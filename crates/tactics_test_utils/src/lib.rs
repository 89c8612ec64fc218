//! # Tactics Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Fixture builders for units, clusters and snapshots
//! - Order-stream determinism harness
//! - Proptest re-export for property tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
