//! Unit tests for the executor context.
