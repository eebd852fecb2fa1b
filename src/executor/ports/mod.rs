//! Port contracts for executor availability tracking.

pub mod repository;

pub use repository::{ExecutorRepository, ExecutorRepositoryError, ExecutorRepositoryResult};
