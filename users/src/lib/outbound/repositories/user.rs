use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use super::database_error;
use crate::domain::context::Context;
use crate::domain::user::errors::RepositoryError;
use crate::domain::user::models::RoleId;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

const USER_COLUMNS: &str = "id, email, username, hashed_password, role_id, last_seen";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    username: String,
    hashed_password: String,
    role_id: Option<String>,
    last_seen: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::from(row.id),
            email: row.email,
            username: row.username,
            hashed_password: row.hashed_password,
            role_id: row.role_id.map(RoleId::from),
            last_seen: row.last_seen,
        }
    }
}

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(
        &self,
        ctx: &Context,
        column: &str,
        value: &str,
    ) -> Result<User, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");

        ctx.run(
            sqlx::query_as::<_, UserRow>(&query)
                .bind(value)
                .fetch_optional(&self.pool),
        )
        .await?
        .map_err(database_error)?
        .map(User::from)
        .ok_or_else(|| RepositoryError::NotFound(value.to_string()))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, ctx: &Context, mut user: User) -> Result<User, RepositoryError> {
        if !user.id.is_assigned() {
            user.id = UserId::generate();
        }

        let query = format!(
            r#"
            INSERT INTO users (id, email, username, hashed_password, role_id, last_seen)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        );

        let row = ctx
            .run(
                sqlx::query_as::<_, UserRow>(&query)
                    .bind(user.id.as_str())
                    .bind(&user.email)
                    .bind(&user.username)
                    .bind(&user.hashed_password)
                    .bind(user.role_id.as_ref().map(RoleId::as_str))
                    .bind(user.last_seen)
                    .fetch_one(&self.pool),
            )
            .await?
            .map_err(database_error)?;

        Ok(row.into())
    }

    async fn update(&self, ctx: &Context, user: User) -> Result<User, RepositoryError> {
        let query = format!(
            r#"
            UPDATE users
            SET email = $2, username = $3, hashed_password = $4, role_id = $5, last_seen = $6
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        ctx.run(
            sqlx::query_as::<_, UserRow>(&query)
                .bind(user.id.as_str())
                .bind(&user.email)
                .bind(&user.username)
                .bind(&user.hashed_password)
                .bind(user.role_id.as_ref().map(RoleId::as_str))
                .bind(user.last_seen)
                .fetch_optional(&self.pool),
        )
        .await?
        .map_err(database_error)?
        .map(User::from)
        .ok_or_else(|| RepositoryError::NotFound(user.id.to_string()))
    }

    async fn get_by_id(&self, ctx: &Context, id: &UserId) -> Result<User, RepositoryError> {
        self.find_one(ctx, "id", id.as_str()).await
    }

    async fn get_by_email(&self, ctx: &Context, email: &str) -> Result<User, RepositoryError> {
        self.find_one(ctx, "email", email).await
    }

    async fn get_by_username(
        &self,
        ctx: &Context,
        username: &str,
    ) -> Result<User, RepositoryError> {
        self.find_one(ctx, "username", username).await
    }

    async fn list(&self, ctx: &Context) -> Result<Vec<User>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY username");

        let rows = ctx
            .run(sqlx::query_as::<_, UserRow>(&query).fetch_all(&self.pool))
            .await?
            .map_err(database_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn delete(&self, ctx: &Context, id: &UserId) -> Result<(), RepositoryError> {
        let result = ctx
            .run(
                sqlx::query("DELETE FROM users WHERE id = $1")
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
}
