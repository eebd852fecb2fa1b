//! Local persistence of dashboard state.
//!
//! A string key/value port mirrors the six persisted records; snapshot
//! restoration degrades to the canonical seed rather than failing.

mod file;
mod key;
mod memory;
mod snapshot;
mod store;

pub use file::JsonFileStateStore;
pub use key::StateKey;
pub use memory::InMemoryStateStore;
pub use snapshot::{SnapshotError, SnapshotResult, SnapshotService};
pub use store::{StateStore, StoreError, StoreResult};

#[cfg(test)]
mod tests;
