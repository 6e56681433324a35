pub mod memory;
pub mod role;
pub mod user;

pub use memory::InMemoryRoleRepository;
pub use memory::InMemoryUserRepository;
pub use role::PostgresRoleRepository;
pub use user::PostgresUserRepository;

use crate::domain::user::errors::RepositoryError;

/// Unique violations keep the constraint name; everything else is opaque.
fn database_error(e: sqlx::Error) -> RepositoryError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(db_err.constraint().unwrap_or("unique").to_string());
        }
    }

    tracing::error!(error = %e, "Database query failed");
    RepositoryError::Database(e.to_string())
}
