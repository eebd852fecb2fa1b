//! Unit tests for the storage context.

mod snapshot_tests;
