//! Executor availability tracking.
//!
//! Maintains the busy/free status, performance history, and aggregate
//! rating of every executor as pure derived state: mutations arrive only
//! through task lifecycle events and the deadline monitor. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
