//! Domain model for identity and access control.
//!
//! Owns the account aggregate, role enumeration, and the
//! single-administrator reconciliation pass while keeping all
//! infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod reconcile;
mod user;

pub use error::{IdentityDomainError, ParseRoleError};
pub use ids::{Specialization, UserId, Username};
pub use reconcile::reconcile_admin;
pub use user::{Role, User};
