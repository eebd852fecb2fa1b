//! Domain model for executor availability and performance tracking.
//!
//! Availability and the aggregate rating are derived state: they change
//! only as a consequence of task lifecycle events.

mod error;
mod executor;
mod rating;

pub use error::{ExecutorDomainError, ParseExecutorStatusError};
pub use executor::{Executor, ExecutorStatus, TaskHistoryEntry};
pub use rating::{Rating, Score, TaskScores};
