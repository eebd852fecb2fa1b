//! Adapter implementations for executor ports.

pub mod memory;
