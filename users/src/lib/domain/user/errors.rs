use thiserror::Error;

use crate::domain::context::ContextError;

/// Error returned by repository adapters.
///
/// The service never branches on the variant: any lookup failure reads as
/// "not found", any write failure is wrapped into the matching [`UserError`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("Database error: {0}")]
    Database(String),
}

/// Error for password hashing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

/// Error for token issuance and validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Token expired")]
    Expired,

    #[error("Token invalid: {0}")]
    Invalid(String),
}

/// Top-level error for all user and role operations.
///
/// Variants carrying a `String` wrap the rendered cause of the dependency
/// failure; the cause's type never crosses this boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error("email already taken")]
    EmailTaken,

    /// Reserved: registration does not check username uniqueness.
    #[error("username already exists")]
    UsernameAlreadyExists,

    #[error("failed to create role: {0}")]
    FailedToCreateRole(String),

    #[error("failed to create user: {0}")]
    FailedToCreateUser(String),

    #[error("failed to update user: {0}")]
    FailedToUpdateUser(String),

    #[error("failed to delete user: {0}")]
    FailedToDeleteUser(String),

    #[error("failed to list users: {0}")]
    FailedToListUsers(String),

    #[error("failed to list roles: {0}")]
    FailedToListRoles(String),

    #[error("role not found")]
    RoleNotFound,

    #[error("failed to hash password: {0}")]
    FailedToHashPassword(String),

    #[error("cannot use the same password")]
    CannotUseSamePassword,

    #[error("failed to generate token: {0}")]
    FailedToGenerateToken(String),
}
