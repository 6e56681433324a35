use async_trait::async_trait;

use crate::domain::context::Context;
use crate::domain::user::errors::PasswordError;
use crate::domain::user::errors::RepositoryError;
use crate::domain::user::errors::TokenError;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::LoginInput;
use crate::domain::user::models::RegisterInput;
use crate::domain::user::models::Role;
use crate::domain::user::models::RoleId;
use crate::domain::user::models::RoleName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for user and role management operations.
///
/// Consumed by transport adapters, which own request parsing and the mapping
/// from [`UserError`] to status codes.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new account holding the default "user" role.
    ///
    /// The "user" role is created on first use.
    ///
    /// # Arguments
    /// * `ctx` - Execution context forwarded to every dependency
    /// * `input` - Email, username and plaintext password
    ///
    /// # Returns
    /// Created user as stored by the repository
    ///
    /// # Errors
    /// * `FailedToHashPassword` - Password could not be hashed
    /// * `EmailTaken` - Another user already has this email
    /// * `FailedToCreateRole` - Default role was missing and could not be created
    /// * `FailedToCreateUser` - Repository rejected the new user
    async fn register(&self, ctx: &Context, input: RegisterInput) -> Result<User, UserError>;

    /// Verify credentials and issue a bearer token.
    ///
    /// # Arguments
    /// * `ctx` - Execution context
    /// * `input` - Email and plaintext password
    ///
    /// # Returns
    /// Token keyed by the user's email and id
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `InvalidCredentials` - Password does not match
    /// * `FailedToGenerateToken` - Tokenizer failed
    async fn login(&self, ctx: &Context, input: LoginInput) -> Result<String, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `UserNotFound` - Lookup failed for any reason
    async fn get_user_by_id(&self, ctx: &Context, id: &UserId) -> Result<User, UserError>;

    /// Persist a modified user as given.
    ///
    /// # Errors
    /// * `FailedToUpdateUser` - Repository update failed
    async fn update_user(&self, ctx: &Context, user: User) -> Result<User, UserError>;

    /// Retrieve all users.
    ///
    /// # Errors
    /// * `FailedToListUsers` - Repository list failed
    async fn list_users(&self, ctx: &Context) -> Result<Vec<User>, UserError>;

    /// Delete user by identifier.
    ///
    /// # Errors
    /// * `FailedToDeleteUser` - Repository delete failed
    async fn delete_user(&self, ctx: &Context, id: &UserId) -> Result<(), UserError>;

    /// Retrieve role by identifier.
    ///
    /// # Errors
    /// * `RoleNotFound` - Lookup failed for any reason
    async fn get_role_by_id(&self, ctx: &Context, id: &RoleId) -> Result<Role, UserError>;

    /// Create a role.
    ///
    /// # Errors
    /// * `FailedToCreateRole` - Repository create failed
    async fn create_role(&self, ctx: &Context, role: Role) -> Result<Role, UserError>;

    /// Point a user at a role.
    ///
    /// # Arguments
    /// * `ctx` - Execution context
    /// * `user_id` - User to modify
    /// * `role_id` - Role to assign
    ///
    /// # Returns
    /// Updated user
    ///
    /// # Errors
    /// * `UserNotFound` - User lookup failed
    /// * `RoleNotFound` - Role lookup failed
    /// * `FailedToUpdateUser` - Repository update failed
    async fn assign_role_to_user(
        &self,
        ctx: &Context,
        user_id: &UserId,
        role_id: &RoleId,
    ) -> Result<User, UserError>;

    /// Retrieve all roles.
    ///
    /// # Errors
    /// * `FailedToListRoles` - Repository list failed
    async fn list_roles(&self, ctx: &Context) -> Result<Vec<Role>, UserError>;

    /// Whether the user's role is the admin role.
    ///
    /// Takes no context: the role lookup runs under [`Context::background`]. Every
    /// failure, including a role id that no longer resolves, yields `false`.
    async fn is_admin(&self, user: &User) -> bool;

    /// Stamp the user's last-seen time with the current time.
    ///
    /// # Errors
    /// * `UserNotFound` - User lookup failed
    /// * `FailedToUpdateUser` - Repository update failed
    async fn update_last_seen(&self, ctx: &Context, user_id: &UserId) -> Result<(), UserError>;

    /// Replace the password after checking the current one.
    ///
    /// The plaintext inputs are compared before the old password is verified, so
    /// equal inputs fail with `CannotUseSamePassword` even when they are wrong.
    ///
    /// # Errors
    /// * `UserNotFound` - User lookup failed
    /// * `CannotUseSamePassword` - `old_password == new_password`
    /// * `InvalidCredentials` - Old password does not match
    /// * `FailedToHashPassword` - New password could not be hashed
    /// * `FailedToUpdateUser` - Repository update failed
    async fn change_password(
        &self,
        ctx: &Context,
        user_id: &UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<User, UserError>;

    /// Replace the password without checking the current one.
    ///
    /// Meant for administrative and out-of-band reset flows.
    ///
    /// # Errors
    /// * `UserNotFound` - User lookup failed
    /// * `FailedToHashPassword` - New password could not be hashed
    /// * `FailedToUpdateUser` - Repository update failed
    async fn reset_password(
        &self,
        ctx: &Context,
        user_id: &UserId,
        new_password: &str,
    ) -> Result<User, UserError>;
}

/// Persistence operations for users.
///
/// Lookups signal absence with an error. Uniqueness enforcement is up to the
/// implementation.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user. Implementations assign the id when it is unassigned.
    async fn create(&self, ctx: &Context, user: User) -> Result<User, RepositoryError>;

    async fn update(&self, ctx: &Context, user: User) -> Result<User, RepositoryError>;

    async fn get_by_id(&self, ctx: &Context, id: &UserId) -> Result<User, RepositoryError>;

    async fn get_by_email(&self, ctx: &Context, email: &str) -> Result<User, RepositoryError>;

    async fn get_by_username(
        &self,
        ctx: &Context,
        username: &str,
    ) -> Result<User, RepositoryError>;

    async fn list(&self, ctx: &Context) -> Result<Vec<User>, RepositoryError>;

    async fn delete(&self, ctx: &Context, id: &UserId) -> Result<(), RepositoryError>;
}

/// Persistence operations for roles.
#[async_trait]
pub trait RoleRepository: Send + Sync + 'static {
    /// Persist a new role. Implementations assign the id when it is unassigned.
    async fn create(&self, ctx: &Context, role: Role) -> Result<Role, RepositoryError>;

    async fn update(&self, ctx: &Context, role: Role) -> Result<Role, RepositoryError>;

    async fn delete(&self, ctx: &Context, id: &RoleId) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, ctx: &Context, id: &RoleId) -> Result<Role, RepositoryError>;

    async fn get_by_name(&self, ctx: &Context, name: &RoleName) -> Result<Role, RepositoryError>;

    async fn list(&self, ctx: &Context) -> Result<Vec<Role>, RepositoryError>;
}

/// One-way password transform.
pub trait PasswordHasher: Send + Sync + 'static {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Whether `password` matches `hashed_password`. Corrupt hashes never match.
    fn verify(&self, hashed_password: &str, password: &str) -> bool;
}

/// Issuer and validator of bearer tokens.
pub trait Tokenizer: Send + Sync + 'static {
    fn generate_token(&self, email: &str, user_id: &UserId) -> Result<String, TokenError>;

    /// Validate a token and return the user id it was issued for.
    fn validate_token(&self, token: &str) -> Result<UserId, TokenError>;
}
