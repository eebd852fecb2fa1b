//! User account aggregate and role enumeration.

use super::{IdentityDomainError, ParseRoleError, Specialization, UserId, Username};
use chrono::NaiveDate;
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Access role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Privileged role with unrestricted access; its existence is a
    /// protected invariant.
    Admin,
    /// Creates and owns tasks; manages executor-role accounts.
    Manager,
    /// Carries out assigned tasks; tracked by the availability component.
    Executor,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Executor => "executor",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "executor" => Ok(Self::Executor),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// User account aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
    password: String,
    name: String,
    role: Role,
    specialization: Option<Specialization>,
    registration_date: NaiveDate,
}

impl User {
    /// Creates a new account registered at the current clock date.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError`] when the display name or password is
    /// empty.
    pub fn new(
        username: Username,
        password: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        specialization: Option<Specialization>,
        clock: &impl Clock,
    ) -> Result<Self, IdentityDomainError> {
        let secret = password.into();
        if secret.is_empty() {
            return Err(IdentityDomainError::EmptyPassword);
        }
        let display_name = name.into();
        if display_name.trim().is_empty() {
            return Err(IdentityDomainError::EmptyName);
        }

        Ok(Self {
            id: UserId::new(),
            username,
            password: secret,
            name: display_name,
            role,
            specialization,
            registration_date: clock.utc().date_naive(),
        })
    }

    /// Builds the canonical seed administrator account.
    ///
    /// Used as the default snapshot seed and by the reconciliation pass when
    /// a stored account set has lost its administrator.
    #[must_use]
    pub fn seed_admin(clock: &impl Clock) -> Self {
        Self {
            id: UserId::new(),
            username: Username::reserved_admin(),
            password: "admin123".to_owned(),
            name: "System Administrator".to_owned(),
            role: Role::Admin,
            specialization: None,
            registration_date: clock.utc().date_naive(),
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the login name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the stored password.
    ///
    /// Credentials are exact-match plaintext; hardening is out of scope.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the access role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the specialization, if recorded.
    #[must_use]
    pub const fn specialization(&self) -> Option<&Specialization> {
        self.specialization.as_ref()
    }

    /// Returns the registration date.
    #[must_use]
    pub const fn registration_date(&self) -> NaiveDate {
        self.registration_date
    }

    /// Replaces the stored password.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyPassword`] for an empty value and
    /// [`IdentityDomainError::PasswordUnchanged`] when the new password
    /// matches the current one.
    pub fn set_password(
        &mut self,
        new_password: impl Into<String>,
    ) -> Result<(), IdentityDomainError> {
        let secret = new_password.into();
        if secret.is_empty() {
            return Err(IdentityDomainError::EmptyPassword);
        }
        if secret == self.password {
            return Err(IdentityDomainError::PasswordUnchanged);
        }
        self.password = secret;
        Ok(())
    }

    /// Replaces the access role.
    pub const fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Returns a copy of this account with the admin role restored when the
    /// login is the reserved administrator name.
    #[must_use]
    pub fn with_admin_role_corrected(&self) -> Self {
        let mut corrected = self.clone();
        if corrected.username.is_reserved_admin() {
            corrected.role = Role::Admin;
        }
        corrected
    }
}
