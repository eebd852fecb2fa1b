//! Capacity-bounded audit trail of user and system actions.
//!
//! Every service mutation and every forced deadline transition records an
//! entry; the trail keeps the 100 most recent, newest first, and is
//! mirrored to the `actionHistory` snapshot record.

mod entry;
mod log;
mod memory;

pub use entry::{AuditActor, AuditEntry};
pub use log::{AUDIT_CAPACITY, AuditLog, AuditLogError, AuditLogResult};
pub use memory::InMemoryAuditLog;

#[cfg(test)]
mod tests;
