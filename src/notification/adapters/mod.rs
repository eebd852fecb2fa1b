//! Adapter implementations for notification ports.

mod memory;

pub use memory::InMemoryNotificationSink;
