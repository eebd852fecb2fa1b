//! Application services for the identity context.

mod accounts;

pub use accounts::{AccessError, AccessResult, AccountService, CreateUserRequest};
