//! Error types for structure learning.

use thiserror::Error;

/// Errors that can occur while learning a causal structure.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in the future without breaking changes.
///
/// Statistical decisions ("cut this edge", "orient this arc") are never
/// errors: they are resolved by numeric comparison. The only fault classes
/// are oracle failures (propagated verbatim), invalid configuration or prior
/// knowledge, numerical corruption that survived clipping, and internal
/// invariant breaks.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LearnError {
    /// The independence oracle failed to produce a score.
    #[error("oracle error: {0}")]
    Oracle(String),

    /// Invalid configuration or contradictory prior knowledge.
    #[error("constraint error: {0}")]
    Constraint(String),

    /// Numerical stability error (NaN/Inf escaping a clipped transform).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Internal invariant violation (programmer error, not user error).
    #[error("internal error: {0}")]
    Internal(String),
}
