//! Error types for executor domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing executor domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutorDomainError {
    /// A rating criterion is outside the accepted 1..=5 range.
    #[error("score {0} is out of range, expected 1..=5")]
    ScoreOutOfRange(u8),

    /// The executor display name is empty after trimming.
    #[error("executor name must not be empty")]
    EmptyName,
}

/// Error returned while parsing availability status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown executor status: {0}")]
pub struct ParseExecutorStatusError(pub String);
