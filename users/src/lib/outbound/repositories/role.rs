use async_trait::async_trait;
use sqlx::PgPool;

use super::database_error;
use crate::domain::context::Context;
use crate::domain::user::errors::RepositoryError;
use crate::domain::user::models::Role;
use crate::domain::user::models::RoleId;
use crate::domain::user::models::RoleName;
use crate::domain::user::ports::RoleRepository;

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: String,
    name: String,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Role {
            id: RoleId::from(row.id),
            name: RoleName::from(row.name),
        }
    }
}

pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn create(&self, ctx: &Context, mut role: Role) -> Result<Role, RepositoryError> {
        if !role.id.is_assigned() {
            role.id = RoleId::generate();
        }

        let row = ctx
            .run(
                sqlx::query_as::<_, RoleRow>(
                    "INSERT INTO roles (id, name) VALUES ($1, $2) RETURNING id, name",
                )
                .bind(role.id.as_str())
                .bind(role.name.as_str())
                .fetch_one(&self.pool),
            )
            .await?
            .map_err(database_error)?;

        Ok(row.into())
    }

    async fn update(&self, ctx: &Context, role: Role) -> Result<Role, RepositoryError> {
        ctx.run(
            sqlx::query_as::<_, RoleRow>(
                "UPDATE roles SET name = $2 WHERE id = $1 RETURNING id, name",
            )
            .bind(role.id.as_str())
            .bind(role.name.as_str())
            .fetch_optional(&self.pool),
        )
        .await?
        .map_err(database_error)?
        .map(Role::from)
        .ok_or_else(|| RepositoryError::NotFound(role.id.to_string()))
    }

    async fn delete(&self, ctx: &Context, id: &RoleId) -> Result<(), RepositoryError> {
        let result = ctx
            .run(
                sqlx::query("DELETE FROM roles WHERE id = $1")
                    .bind(id.as_str())
                    .execute(&self.pool),
            )
            .await?
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn get_by_id(&self, ctx: &Context, id: &RoleId) -> Result<Role, RepositoryError> {
        ctx.run(
            sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles WHERE id = $1")
                .bind(id.as_str())
                .fetch_optional(&self.pool),
        )
        .await?
        .map_err(database_error)?
        .map(Role::from)
        .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn get_by_name(&self, ctx: &Context, name: &RoleName) -> Result<Role, RepositoryError> {
        ctx.run(
            sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles WHERE name = $1")
                .bind(name.as_str())
                .fetch_optional(&self.pool),
        )
        .await?
        .map_err(database_error)?
        .map(Role::from)
        .ok_or_else(|| RepositoryError::NotFound(name.to_string()))
    }

    async fn list(&self, ctx: &Context) -> Result<Vec<Role>, RepositoryError> {
        let rows = ctx
            .run(
                sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles ORDER BY name")
                    .fetch_all(&self.pool),
            )
            .await?
            .map_err(database_error)?;

        Ok(rows.into_iter().map(Role::from).collect())
    }
}
