//! Application services for executor derived state.

mod availability;

pub use availability::{AvailabilityError, AvailabilityResult, AvailabilityService};
