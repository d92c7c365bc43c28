use async_trait::async_trait;
use chrono::{DateTime, Utc};
use masterhub_application::{ListQuery, Page, TenantRepository};
use masterhub_core::{AppError, AppResult, TenantId};
use masterhub_domain::{Ordering, RecordAudit, Tenant, TenantInput};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::postgres_listing::{
    fetch_count, is_unique_violation, push_list_filters, push_ordering, push_page,
};

const TENANT_COLUMNS: &str = "tenants.id, tenants.tenant_name, tenants.representative_name, \
    tenants.email, tenants.tel_number, tenants.postal_code, tenants.state, tenants.city, \
    tenants.address, tenants.address2, tenants.is_deleted, tenants.created_at, \
    tenants.created_by, tenants.updated_at, tenants.updated_by";

const SEARCH_COLUMNS: &[&str] = &["tenant_name", "representative_name", "email", "tel_number"];

/// PostgreSQL-backed tenant repository.
#[derive(Clone)]
pub struct PostgresTenantRepository {
    pool: PgPool,
}

impl PostgresTenantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn filtered(select: &str, query: &ListQuery) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(format!("SELECT {select} FROM tenants WHERE TRUE"));
        push_list_filters(&mut builder, "tenants", query, SEARCH_COLUMNS);
        builder
    }
}

#[derive(Debug, FromRow)]
struct TenantRow {
    id: Uuid,
    tenant_name: String,
    representative_name: String,
    email: String,
    tel_number: Option<String>,
    postal_code: Option<String>,
    state: Option<String>,
    city: Option<String>,
    address: Option<String>,
    address2: Option<String>,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: DateTime<Utc>,
    updated_by: String,
}

impl TryFrom<TenantRow> for Tenant {
    type Error = AppError;

    fn try_from(row: TenantRow) -> Result<Self, Self::Error> {
        let data = TenantInput {
            tenant_name: Some(row.tenant_name),
            representative_name: Some(row.representative_name),
            email: Some(row.email),
            tel_number: row.tel_number,
            postal_code: row.postal_code,
            state: row.state,
            city: row.city,
            address: row.address,
            address2: row.address2,
        }
        .validate()
        .map_err(|errors| {
            AppError::Internal(format!("stored tenant '{}' is invalid: {errors}", row.id))
        })?;

        Ok(Tenant::new(
            TenantId::from_uuid(row.id),
            data,
            RecordAudit::from_parts(
                row.is_deleted,
                row.created_at,
                row.created_by,
                row.updated_at,
                row.updated_by,
            ),
        ))
    }
}

fn tenant_write_error(error: &sqlx::Error, operation: &str) -> AppError {
    if is_unique_violation(error) {
        return AppError::Conflict("a tenant with the same email is already registered".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

#[async_trait]
impl TenantRepository for PostgresTenantRepository {
    async fn list(&self, query: &ListQuery, ordering: Ordering) -> AppResult<Page<Tenant>> {
        let count = fetch_count(Self::filtered("COUNT(*)", query), &self.pool, "tenants").await?;

        let mut builder = Self::filtered(TENANT_COLUMNS, query);
        push_ordering(&mut builder, "tenants", ordering);
        push_page(&mut builder, query);
        let rows = builder
            .build_query_as::<TenantRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list tenants: {error}")))?;

        let items = rows
            .into_iter()
            .map(Tenant::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Page { items, count })
    }

    async fn find(&self, tenant_id: TenantId) -> AppResult<Option<Tenant>> {
        let sql = format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE tenants.id = $1");
        let row = sqlx::query_as::<_, TenantRow>(&sql)
            .bind(tenant_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to find tenant '{tenant_id}': {error}"))
            })?;

        row.map(Tenant::try_from).transpose()
    }

    async fn create(&self, tenant: &Tenant) -> AppResult<()> {
        let data = tenant.data();
        let audit = tenant.audit();
        sqlx::query(
            r#"
            INSERT INTO tenants (
                id, tenant_name, representative_name, email, tel_number, postal_code,
                state, city, address, address2,
                is_deleted, created_at, created_by, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(tenant.id().as_uuid())
        .bind(data.tenant_name())
        .bind(data.representative_name())
        .bind(data.email())
        .bind(data.tel_number())
        .bind(data.postal_code())
        .bind(data.state())
        .bind(data.city())
        .bind(data.address())
        .bind(data.address2())
        .bind(audit.is_deleted())
        .bind(audit.created_at())
        .bind(audit.created_by())
        .bind(audit.updated_at())
        .bind(audit.updated_by())
        .execute(&self.pool)
        .await
        .map_err(|error| tenant_write_error(&error, "create tenant"))?;

        Ok(())
    }

    async fn update(&self, tenant: &Tenant) -> AppResult<()> {
        let data = tenant.data();
        let audit = tenant.audit();
        let result = sqlx::query(
            r#"
            UPDATE tenants
            SET tenant_name = $2,
                representative_name = $3,
                email = $4,
                tel_number = $5,
                postal_code = $6,
                state = $7,
                city = $8,
                address = $9,
                address2 = $10,
                is_deleted = $11,
                updated_at = $12,
                updated_by = $13
            WHERE id = $1
            "#,
        )
        .bind(tenant.id().as_uuid())
        .bind(data.tenant_name())
        .bind(data.representative_name())
        .bind(data.email())
        .bind(data.tel_number())
        .bind(data.postal_code())
        .bind(data.state())
        .bind(data.city())
        .bind(data.address())
        .bind(data.address2())
        .bind(audit.is_deleted())
        .bind(audit.updated_at())
        .bind(audit.updated_by())
        .execute(&self.pool)
        .await
        .map_err(|error| tenant_write_error(&error, "update tenant"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "tenant '{}' does not exist",
                tenant.id()
            )));
        }

        Ok(())
    }
}
