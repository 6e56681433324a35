//! Process-local repositories for tests and single-node development runs.
//!
//! Both enforce uniqueness the way the PostgreSQL schema does, and refuse work
//! on a cancelled or expired [`Context`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::context::Context;
use crate::domain::user::errors::RepositoryError;
use crate::domain::user::models::Role;
use crate::domain::user::models::RoleId;
use crate::domain::user::models::RoleName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::RoleRepository;
use crate::domain::user::ports::UserRepository;

fn ensure_live(ctx: &Context) -> Result<(), RepositoryError> {
    match ctx.err() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(
        users: &HashMap<UserId, User>,
        candidate: &User,
    ) -> Result<(), RepositoryError> {
        for existing in users.values().filter(|u| u.id != candidate.id) {
            if existing.email == candidate.email {
                return Err(RepositoryError::Conflict("users_email_key".to_string()));
            }
            if existing.username == candidate.username {
                return Err(RepositoryError::Conflict("users_username_key".to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, ctx: &Context, mut user: User) -> Result<User, RepositoryError> {
        ensure_live(ctx)?;
        let mut users = self.users.write().await;

        if !user.id.is_assigned() {
            user.id = UserId::generate();
        }
        if users.contains_key(&user.id) {
            return Err(RepositoryError::Conflict("users_pkey".to_string()));
        }
        Self::check_unique(&users, &user)?;

        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn update(&self, ctx: &Context, user: User) -> Result<User, RepositoryError> {
        ensure_live(ctx)?;
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(RepositoryError::NotFound(user.id.to_string()));
        }
        Self::check_unique(&users, &user)?;

        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, ctx: &Context, id: &UserId) -> Result<User, RepositoryError> {
        ensure_live(ctx)?;
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn get_by_email(&self, ctx: &Context, email: &str) -> Result<User, RepositoryError> {
        ensure_live(ctx)?;
        self.users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(email.to_string()))
    }

    async fn get_by_username(
        &self,
        ctx: &Context,
        username: &str,
    ) -> Result<User, RepositoryError> {
        ensure_live(ctx)?;
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(username.to_string()))
    }

    async fn list(&self, ctx: &Context) -> Result<Vec<User>, RepositoryError> {
        ensure_live(ctx)?;
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn delete(&self, ctx: &Context, id: &UserId) -> Result<(), RepositoryError> {
        ensure_live(ctx)?;
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<RoleId, Role>>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(roles: &HashMap<RoleId, Role>, candidate: &Role) -> Result<(), RepositoryError> {
        if roles
            .values()
            .any(|r| r.id != candidate.id && r.name == candidate.name)
        {
            return Err(RepositoryError::Conflict("roles_name_key".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn create(&self, ctx: &Context, mut role: Role) -> Result<Role, RepositoryError> {
        ensure_live(ctx)?;
        let mut roles = self.roles.write().await;

        if !role.id.is_assigned() {
            role.id = RoleId::generate();
        }
        if roles.contains_key(&role.id) {
            return Err(RepositoryError::Conflict("roles_pkey".to_string()));
        }
        Self::check_unique(&roles, &role)?;

        roles.insert(role.id.clone(), role.clone());
        Ok(role)
    }

    async fn update(&self, ctx: &Context, role: Role) -> Result<Role, RepositoryError> {
        ensure_live(ctx)?;
        let mut roles = self.roles.write().await;

        if !roles.contains_key(&role.id) {
            return Err(RepositoryError::NotFound(role.id.to_string()));
        }
        Self::check_unique(&roles, &role)?;

        roles.insert(role.id.clone(), role.clone());
        Ok(role)
    }

    async fn delete(&self, ctx: &Context, id: &RoleId) -> Result<(), RepositoryError> {
        ensure_live(ctx)?;
        self.roles
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn get_by_id(&self, ctx: &Context, id: &RoleId) -> Result<Role, RepositoryError> {
        ensure_live(ctx)?;
        self.roles
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn get_by_name(&self, ctx: &Context, name: &RoleName) -> Result<Role, RepositoryError> {
        ensure_live(ctx)?;
        self.roles
            .read()
            .await
            .values()
            .find(|r| &r.name == name)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(name.to_string()))
    }

    async fn list(&self, ctx: &Context) -> Result<Vec<Role>, RepositoryError> {
        ensure_live(ctx)?;
        let mut roles: Vec<Role> = self.roles.read().await.values().cloned().collect();
        roles.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(roles)
    }
}
