//! User-visible notifications with repeat suppression.
//!
//! Every lifecycle mutation and deadline warning flows through the
//! [`services::Notifier`], which consults a time-windowed dedup map before
//! handing the notification to a delivery sink. The module follows
//! hexagonal architecture:
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
