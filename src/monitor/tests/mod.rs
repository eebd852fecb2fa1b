//! Unit tests for the deadline monitor.
