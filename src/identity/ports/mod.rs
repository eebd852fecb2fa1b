//! Port contracts for identity and access control.
//!
//! Ports define infrastructure-agnostic interfaces used by identity
//! services.

pub mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
