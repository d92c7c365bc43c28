use masterhub_core::AppError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::api_config::ApiConfig;

pub async fn connect(config: &ApiConfig) -> Result<PgPool, AppError> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    tracing::info!("database migrations applied");
    Ok(())
}
