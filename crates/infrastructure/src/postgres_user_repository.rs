//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use masterhub_application::{UserRecord, UserRepository};
use masterhub_core::{AppError, AppResult, TenantId};
use masterhub_domain::{EmailAddress, UserId};

use crate::postgres_listing::is_unique_violation;

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    tenant_id: uuid::Uuid,
    email: String,
    display_name: String,
    password_hash: String,
    is_active: bool,
    is_staff: bool,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            email: EmailAddress::new(row.email)?,
            display_name: row.display_name,
            password_hash: row.password_hash,
            is_active: row.is_active,
            is_staff: row.is_staff,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, tenant_id, email, display_name, password_hash, is_active, is_staff
            FROM users
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by email: {error}")))?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn create(&self, user: &UserRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, tenant_id, email, display_name, password_hash, is_active, is_staff)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.tenant_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.display_name.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.is_active)
        .bind(user.is_staff)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict("an account with this email already exists".to_owned());
            }

            AppError::Internal(format!("failed to create user: {error}"))
        })?;

        Ok(())
    }
}
