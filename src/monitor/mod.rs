//! Deadline monitoring.
//!
//! A pure scanner classifies every in-progress task into an urgency band
//! and a tokio loop drives it on a fixed cadence with an on-demand rescan
//! trigger.

mod scan;
mod service;

pub use scan::{DeadlineBand, DeadlineScanner, MonitorError, MonitorResult, ScanOutcome};
pub use service::{DEFAULT_SCAN_PERIOD, MonitorHandle, spawn, spawn_with_period};

#[cfg(test)]
mod tests;
