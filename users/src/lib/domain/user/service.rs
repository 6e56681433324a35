use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::context::Context;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::LoginInput;
use crate::domain::user::models::RegisterInput;
use crate::domain::user::models::Role;
use crate::domain::user::models::RoleId;
use crate::domain::user::models::RoleName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::PasswordHasher;
use crate::domain::user::ports::RoleRepository;
use crate::domain::user::ports::Tokenizer;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

/// Domain service implementation for user and role operations.
///
/// Stateless: every call is a short sequence of dependency calls, and the
/// first failure ends it. Multi-step operations are not transactional.
pub struct UserService<UR, RR, PH, TK>
where
    UR: UserRepository,
    RR: RoleRepository,
    PH: PasswordHasher,
    TK: Tokenizer,
{
    user_repository: Arc<UR>,
    role_repository: Arc<RR>,
    password_hasher: Arc<PH>,
    tokenizer: Arc<TK>,
}

impl<UR, RR, PH, TK> UserService<UR, RR, PH, TK>
where
    UR: UserRepository,
    RR: RoleRepository,
    PH: PasswordHasher,
    TK: Tokenizer,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `user_repository` - User persistence implementation
    /// * `role_repository` - Role persistence implementation
    /// * `password_hasher` - Password hashing implementation
    /// * `tokenizer` - Token issuance implementation
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(
        user_repository: Arc<UR>,
        role_repository: Arc<RR>,
        password_hasher: Arc<PH>,
        tokenizer: Arc<TK>,
    ) -> Self {
        Self {
            user_repository,
            role_repository,
            password_hasher,
            tokenizer,
        }
    }

    async fn find_user(&self, ctx: &Context, id: &UserId) -> Result<User, UserError> {
        self.user_repository
            .get_by_id(ctx, id)
            .await
            .map_err(|_| UserError::UserNotFound)
    }

    async fn default_role(&self, ctx: &Context) -> Result<Role, UserError> {
        if let Ok(role) = self.role_repository.get_by_name(ctx, &RoleName::User).await {
            return Ok(role);
        }

        tracing::info!(role = %RoleName::User, "Default role missing, creating it");
        self.role_repository
            .create(ctx, Role::new(RoleName::User))
            .await
            .map_err(|e| UserError::FailedToCreateRole(e.to_string()))
    }

    async fn store_password(
        &self,
        ctx: &Context,
        mut user: User,
        new_password: &str,
    ) -> Result<User, UserError> {
        user.hashed_password = self
            .password_hasher
            .hash(new_password)
            .map_err(|e| UserError::FailedToHashPassword(e.to_string()))?;

        self.user_repository
            .update(ctx, user)
            .await
            .map_err(|e| UserError::FailedToUpdateUser(e.to_string()))
    }
}

#[async_trait]
impl<UR, RR, PH, TK> UserServicePort for UserService<UR, RR, PH, TK>
where
    UR: UserRepository,
    RR: RoleRepository,
    PH: PasswordHasher,
    TK: Tokenizer,
{
    async fn register(&self, ctx: &Context, input: RegisterInput) -> Result<User, UserError> {
        let hashed_password = self
            .password_hasher
            .hash(&input.password)
            .map_err(|e| UserError::FailedToHashPassword(e.to_string()))?;

        if self
            .user_repository
            .get_by_email(ctx, &input.email)
            .await
            .is_ok()
        {
            return Err(UserError::EmailTaken);
        }

        let role = self.default_role(ctx).await?;

        let user = User {
            id: UserId::default(),
            email: input.email,
            username: input.username,
            hashed_password,
            role_id: Some(role.id),
            last_seen: Utc::now(),
        };

        let created_user = self
            .user_repository
            .create(ctx, user)
            .await
            .map_err(|e| UserError::FailedToCreateUser(e.to_string()))?;

        tracing::info!(user_id = %created_user.id, "User registered");
        Ok(created_user)
    }

    async fn login(&self, ctx: &Context, input: LoginInput) -> Result<String, UserError> {
        let user = self
            .user_repository
            .get_by_email(ctx, &input.email)
            .await
            .map_err(|_| UserError::UserNotFound)?;

        if !self
            .password_hasher
            .verify(&user.hashed_password, &input.password)
        {
            tracing::warn!(user_id = %user.id, "Login rejected: invalid credentials");
            return Err(UserError::InvalidCredentials);
        }

        self.tokenizer
            .generate_token(&user.email, &user.id)
            .map_err(|e| UserError::FailedToGenerateToken(e.to_string()))
    }

    async fn get_user_by_id(&self, ctx: &Context, id: &UserId) -> Result<User, UserError> {
        self.find_user(ctx, id).await
    }

    async fn update_user(&self, ctx: &Context, user: User) -> Result<User, UserError> {
        self.user_repository
            .update(ctx, user)
            .await
            .map_err(|e| UserError::FailedToUpdateUser(e.to_string()))
    }

    async fn list_users(&self, ctx: &Context) -> Result<Vec<User>, UserError> {
        self.user_repository
            .list(ctx)
            .await
            .map_err(|e| UserError::FailedToListUsers(e.to_string()))
    }

    async fn delete_user(&self, ctx: &Context, id: &UserId) -> Result<(), UserError> {
        self.user_repository
            .delete(ctx, id)
            .await
            .map_err(|e| UserError::FailedToDeleteUser(e.to_string()))
    }

    async fn get_role_by_id(&self, ctx: &Context, id: &RoleId) -> Result<Role, UserError> {
        self.role_repository
            .get_by_id(ctx, id)
            .await
            .map_err(|_| UserError::RoleNotFound)
    }

    async fn create_role(&self, ctx: &Context, role: Role) -> Result<Role, UserError> {
        self.role_repository
            .create(ctx, role)
            .await
            .map_err(|e| UserError::FailedToCreateRole(e.to_string()))
    }

    async fn assign_role_to_user(
        &self,
        ctx: &Context,
        user_id: &UserId,
        role_id: &RoleId,
    ) -> Result<User, UserError> {
        let mut user = self.find_user(ctx, user_id).await?;
        let role = self.get_role_by_id(ctx, role_id).await?;

        user.role_id = Some(role.id);
        let updated_user = self.update_user(ctx, user).await?;

        tracing::info!(user_id = %updated_user.id, role = %role.name, "Role assigned");
        Ok(updated_user)
    }

    async fn list_roles(&self, ctx: &Context) -> Result<Vec<Role>, UserError> {
        self.role_repository
            .list(ctx)
            .await
            .map_err(|e| UserError::FailedToListRoles(e.to_string()))
    }

    async fn is_admin(&self, user: &User) -> bool {
        let Some(role_id) = &user.role_id else {
            return false;
        };

        match self
            .role_repository
            .get_by_id(&Context::background(), role_id)
            .await
        {
            Ok(role) => role.name == RoleName::Admin,
            Err(e) => {
                tracing::debug!(
                    user_id = %user.id,
                    role_id = %role_id,
                    error = %e,
                    "Role lookup failed, treating user as non-admin"
                );
                false
            }
        }
    }

    async fn update_last_seen(&self, ctx: &Context, user_id: &UserId) -> Result<(), UserError> {
        let mut user = self.find_user(ctx, user_id).await?;

        user.last_seen = Utc::now();
        self.update_user(ctx, user).await?;

        Ok(())
    }

    async fn change_password(
        &self,
        ctx: &Context,
        user_id: &UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<User, UserError> {
        let user = self.find_user(ctx, user_id).await?;

        // Plaintext comparison, deliberately ahead of verification.
        if old_password == new_password {
            return Err(UserError::CannotUseSamePassword);
        }

        if !self
            .password_hasher
            .verify(&user.hashed_password, old_password)
        {
            tracing::warn!(user_id = %user.id, "Password change rejected: invalid credentials");
            return Err(UserError::InvalidCredentials);
        }

        let updated_user = self.store_password(ctx, user, new_password).await?;

        tracing::info!(user_id = %updated_user.id, "Password changed");
        Ok(updated_user)
    }

    async fn reset_password(
        &self,
        ctx: &Context,
        user_id: &UserId,
        new_password: &str,
    ) -> Result<User, UserError> {
        let user = self.find_user(ctx, user_id).await?;
        let updated_user = self.store_password(ctx, user, new_password).await?;

        tracing::info!(user_id = %updated_user.id, "Password reset");
        Ok(updated_user)
    }
}
