//! Taskboard: role-based task management core.
//!
//! This crate provides the domain and service layer of a small task
//! dashboard: accounts with a three-role permission model, a task
//! lifecycle whose transitions drive derived executor state, deadline
//! monitoring, deduplicated notifications, an audit trail, and local
//! snapshot persistence.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (memory, filesystem)
//!
//! # Modules
//!
//! - [`identity`]: Accounts, roles, authentication, admin reconciliation
//! - [`executor`]: Executor availability, history, and rating
//! - [`task`]: Task lifecycle and its derived effects
//! - [`notification`]: Deduplicated notification delivery
//! - [`audit`]: Capacity-bounded action trail
//! - [`monitor`]: Deadline scanning and the background loop
//! - [`storage`]: Key/value snapshot persistence

pub mod audit;
pub mod executor;
pub mod identity;
pub mod monitor;
pub mod notification;
pub mod storage;
pub mod task;
