//! Invariant-restoring pass over the account set.
//!
//! Runs after every snapshot load and after every user-set mutation. The
//! restored invariant: exactly one administrator exists, and an account
//! carrying the reserved `admin` login always holds the admin role.

use super::{Role, User};
use mockable::Clock;

/// Repairs the single-administrator invariant in place.
///
/// Rules, applied in order:
///
/// 1. any account with the reserved login has its role forced to admin;
/// 2. if no administrator remains, the seed administrator is prepended;
/// 3. if several administrators exist, the reserved-login one (else the
///    first) keeps the role and the rest are demoted to manager.
///
/// Returns `true` when any account was changed or inserted.
pub fn reconcile_admin(users: &mut Vec<User>, clock: &impl Clock) -> bool {
    let mut changed = false;

    for user in users.iter_mut() {
        if user.username().is_reserved_admin() && user.role() != Role::Admin {
            user.set_role(Role::Admin);
            changed = true;
        }
    }

    if !users.iter().any(|user| user.role() == Role::Admin) {
        users.insert(0, User::seed_admin(clock));
        return true;
    }

    let keeper = users
        .iter()
        .position(|user| user.role() == Role::Admin && user.username().is_reserved_admin())
        .or_else(|| users.iter().position(|user| user.role() == Role::Admin));
    if let Some(keeper_index) = keeper {
        for (index, user) in users.iter_mut().enumerate() {
            if index != keeper_index && user.role() == Role::Admin {
                user.set_role(Role::Manager);
                changed = true;
            }
        }
    }

    changed
}
