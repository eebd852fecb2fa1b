//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyName,

    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// The specialization label is empty after trimming.
    #[error("specialization must not be empty")]
    EmptySpecialization,

    /// A new password must differ from the one it replaces.
    #[error("new password must differ from the current password")]
    PasswordUnchanged,
}

/// Error returned while parsing roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
