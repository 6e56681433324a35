use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use users::config::Config;
use users::context::Context;
use users::credentials::Argon2PasswordHasher;
use users::credentials::JwtTokenizer;
use users::repositories::PostgresRoleRepository;
use users::repositories::PostgresUserRepository;
use users::user::errors::UserError;
use users::user::models::RegisterInput;
use users::user::models::Role;
use users::user::models::RoleName;
use users::user::ports::UserRepository;
use users::user::ports::UserServicePort;
use users::user::service::UserService;

const BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(30);

/// Provision the database: schema, well-known roles and, when configured,
/// an administrator account. Safe to run repeatedly.
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "users=debug,bootstrap=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "bootstrap",
        version = env!("CARGO_PKG_VERSION"),
        "Bootstrap starting"
    );

    let config = Config::load()?;

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let role_repository = Arc::new(PostgresRoleRepository::new(pg_pool));
    let password_hasher = Arc::new(Argon2PasswordHasher::new(&config.password)?);
    let tokenizer = Arc::new(JwtTokenizer::new(&config.jwt));

    let user_service = UserService::new(
        Arc::clone(&user_repository),
        role_repository,
        password_hasher,
        tokenizer,
    );

    let ctx = Context::background().with_timeout(BOOTSTRAP_TIMEOUT);

    let mut roles = user_service.list_roles(&ctx).await?;
    for name in RoleName::well_known() {
        if roles.iter().any(|role| role.name == name) {
            continue;
        }
        let role = user_service.create_role(&ctx, Role::new(name)).await?;
        tracing::info!(role = %role.name, role_id = %role.id, "Role created");
        roles.push(role);
    }

    let Some((email, username, password)) = config.bootstrap.admin_account() else {
        tracing::info!("No administrator configured, bootstrap complete");
        return Ok(());
    };

    let admin_role = roles
        .iter()
        .find(|role| role.name == RoleName::Admin)
        .context("admin role missing after provisioning")?;

    let admin = match user_service
        .register(&ctx, RegisterInput::new(email, username, password))
        .await
    {
        Ok(user) => user,
        Err(UserError::EmailTaken) => {
            tracing::info!(email = %email, "Administrator already registered");
            user_repository.get_by_email(&ctx, email).await?
        }
        Err(e) => return Err(e.into()),
    };

    if user_service.is_admin(&admin).await {
        tracing::info!(user_id = %admin.id, "Administrator already holds the admin role");
    } else {
        user_service
            .assign_role_to_user(&ctx, &admin.id, &admin_role.id)
            .await?;
    }

    tracing::info!(user_id = %admin.id, "Bootstrap complete");
    Ok(())
}
