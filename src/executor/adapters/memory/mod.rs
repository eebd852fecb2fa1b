//! In-memory adapters for executor persistence.

mod executor;

pub use executor::InMemoryExecutorRepository;
