//! Error types for the decision core.

use thiserror::Error;

/// Result type alias using [`AgentError`].
pub type Result<T> = std::result::Result<T, AgentError>;

/// Top-level error type for agent failures.
///
/// Two conditions deliberately do NOT appear here:
///
/// - A command precondition not being met (e.g. no free formation
///   group) is a silent local recovery: the command is discarded
///   without emitting an order.
/// - Asking for the pairing partner of an unpaired kind is a static
///   configuration bug and panics instead of returning an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgentError {
    /// The host supplied a snapshot with a zero refill interval.
    #[error("refill interval must be non-zero")]
    ZeroRefillInterval,

    /// Formation build requested with no allied units.
    #[error("cannot build formation matrix: no allied units in snapshot")]
    EmptyFormation,

    /// Snapshot (de)serialization failure.
    #[error("snapshot codec error: {0}")]
    SnapshotCodec(String),
}
