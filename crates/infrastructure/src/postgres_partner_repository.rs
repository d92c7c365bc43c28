use async_trait::async_trait;
use chrono::{DateTime, Utc};
use masterhub_application::{ListQuery, Page, PartnerRepository};
use masterhub_core::{AppError, AppResult, TenantId};
use masterhub_domain::{Ordering, Partner, PartnerId, PartnerInput, PartnerKey, RecordAudit};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::postgres_listing::{
    fetch_count, is_unique_violation, push_list_filters, push_ordering, push_page,
};


const PARTNER_COLUMNS: &str = "partners.id, partners.tenant_id, partners.partner_name, \
    partners.partner_name_kana, partners.partner_type, partners.contact_name, \
    partners.tel_number, partners.email, partners.postal_code, partners.state, partners.city, \
    partners.address, partners.address2, partners.is_deleted, partners.created_at, \
    partners.created_by, partners.updated_at, partners.updated_by";

const SEARCH_COLUMNS: &[&str] = &[
    "partner_name",
    "partner_name_kana",
    "contact_name",
    "email",
    "tel_number",
];

// Stays well below the PostgreSQL limit of 65535 bind parameters per statement.
const INSERT_CHUNK_SIZE: usize = 1000;

const DUPLICATE_KEY_MESSAGE: &str =
    "a partner with the same partner name + email is already registered";

/// PostgreSQL-backed partner repository.
#[derive(Clone)]
pub struct PostgresPartnerRepository {
    pool: PgPool,
}

impl PostgresPartnerRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn filtered(
        select: &str,
        tenant_id: TenantId,
        query: &ListQuery,
    ) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {select} FROM partners WHERE partners.tenant_id = "
        ));
        builder.push_bind(tenant_id.as_uuid());
        push_list_filters(&mut builder, "partners", query, SEARCH_COLUMNS);
        builder
    }

    async fn fetch_partners(
        &self,
        mut builder: QueryBuilder<'_, Postgres>,
    ) -> AppResult<Vec<Partner>> {
        let rows = builder
            .build_query_as::<PartnerRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list partners: {error}")))?;

        rows.into_iter().map(Partner::try_from).collect()
    }
}

#[derive(Debug, FromRow)]
struct PartnerRow {
    id: Uuid,
    tenant_id: Uuid,
    partner_name: String,
    partner_name_kana: Option<String>,
    partner_type: String,
    contact_name: Option<String>,
    tel_number: Option<String>,
    email: String,
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

impl TryFrom<PartnerRow> for Partner {
    type Error = AppError;

    fn try_from(row: PartnerRow) -> Result<Self, Self::Error> {
        let data = PartnerInput {
            partner_name: Some(row.partner_name),
            partner_name_kana: row.partner_name_kana,
            partner_type: Some(row.partner_type.parse()?),
            contact_name: row.contact_name,
            tel_number: row.tel_number,
            email: Some(row.email),
            postal_code: row.postal_code,
            state: row.state,
            city: row.city,
            address: row.address,
            address2: row.address2,
        }
        .validate()
        .map_err(|errors| {
            AppError::Internal(format!("stored partner '{}' is invalid: {errors}", row.id))
        })?;

        Ok(Partner::new(
            PartnerId::from_uuid(row.id),
            TenantId::from_uuid(row.tenant_id),
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

#[async_trait]
impl PartnerRepository for PostgresPartnerRepository {
    async fn list(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        ordering: Ordering,
    ) -> AppResult<Page<Partner>> {
        let count = fetch_count(
            Self::filtered("COUNT(*)", tenant_id, query),
            &self.pool,
            "partners",
        )
        .await?;

        let mut builder = Self::filtered(PARTNER_COLUMNS, tenant_id, query);
        push_ordering(&mut builder, "partners", ordering);
        push_page(&mut builder, query);
        let items = self.fetch_partners(builder).await?;

        Ok(Page { items, count })
    }

    async fn list_all(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        ordering: Ordering,
    ) -> AppResult<Vec<Partner>> {
        let mut builder = Self::filtered(PARTNER_COLUMNS, tenant_id, query);
        push_ordering(&mut builder, "partners", ordering);
        self.fetch_partners(builder).await
    }

    async fn find(
        &self,
        tenant_id: TenantId,
        partner_id: PartnerId,
    ) -> AppResult<Option<Partner>> {
        let sql = format!(
            "SELECT {PARTNER_COLUMNS} FROM partners \
             WHERE partners.tenant_id = $1 AND partners.id = $2"
        );
        let row = sqlx::query_as::<_, PartnerRow>(&sql)
        .bind(tenant_id.as_uuid())
        .bind(partner_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find partner '{partner_id}': {error}"))
        })?;

        row.map(Partner::try_from).transpose()
    }

    async fn create(&self, partner: Partner) -> AppResult<()> {
        let mut connection = self.pool.acquire().await.map_err(|error| {
            AppError::Internal(format!("failed to acquire connection: {error}"))
        })?;

        insert_partners(&mut *connection, std::slice::from_ref(&partner)).await
    }

    async fn update(&self, partner: Partner) -> AppResult<()> {
        let data = partner.data();
        let audit = partner.audit();
        let result = sqlx::query(
            r#"
            UPDATE partners
            SET partner_name = $3,
                partner_name_kana = $4,
                partner_type = $5,
                contact_name = $6,
                tel_number = $7,
                email = $8,
                postal_code = $9,
                state = $10,
                city = $11,
                address = $12,
                address2 = $13,
                is_deleted = $14,
                updated_at = $15,
                updated_by = $16
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(partner.tenant_id().as_uuid())
        .bind(partner.id().as_uuid())
        .bind(data.partner_name())
        .bind(data.partner_name_kana())
        .bind(data.partner_type().as_str())
        .bind(data.contact_name())
        .bind(data.tel_number())
        .bind(data.email())
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
        .map_err(|error| partner_write_error(&error, "update partner"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "partner '{}' does not exist",
                partner.id()
            )));
        }

        Ok(())
    }

    async fn exists_by_key(&self, tenant_id: TenantId, key: &PartnerKey) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM partners
                WHERE tenant_id = $1 AND partner_name = $2 AND email = $3
            )
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(key.partner_name())
        .bind(key.email())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to check partner key: {error}"))
        })
    }

    async fn create_many(&self, partners: Vec<Partner>) -> AppResult<usize> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        for chunk in partners.chunks(INSERT_CHUNK_SIZE) {
            insert_partners(&mut *transaction, chunk).await?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(partners.len())
    }
}

async fn insert_partners(connection: &mut PgConnection, partners: &[Partner]) -> AppResult<()> {
    if partners.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        "INSERT INTO partners (id, tenant_id, partner_name, partner_name_kana, partner_type, \
         contact_name, tel_number, email, postal_code, state, city, address, address2, \
         is_deleted, created_at, created_by, updated_at, updated_by) ",
    );
    builder.push_values(partners, |mut values, partner| {
        let data = partner.data();
        let audit = partner.audit();
        values
            .push_bind(partner.id().as_uuid())
            .push_bind(partner.tenant_id().as_uuid())
            .push_bind(data.partner_name().to_owned())
            .push_bind(data.partner_name_kana().map(ToOwned::to_owned))
            .push_bind(data.partner_type().as_str())
            .push_bind(data.contact_name().map(ToOwned::to_owned))
            .push_bind(data.tel_number().map(ToOwned::to_owned))
            .push_bind(data.email().to_owned())
            .push_bind(data.postal_code().map(ToOwned::to_owned))
            .push_bind(data.state().map(ToOwned::to_owned))
            .push_bind(data.city().map(ToOwned::to_owned))
            .push_bind(data.address().map(ToOwned::to_owned))
            .push_bind(data.address2().map(ToOwned::to_owned))
            .push_bind(audit.is_deleted())
            .push_bind(audit.created_at())
            .push_bind(audit.created_by().to_owned())
            .push_bind(audit.updated_at())
            .push_bind(audit.updated_by().to_owned());
    });

    builder
        .build()
        .execute(&mut *connection)
        .await
        .map_err(|error| partner_write_error(&error, "insert partners"))?;

    Ok(())
}

fn partner_write_error(error: &sqlx::Error, operation: &str) -> AppError {
    if is_unique_violation(error) {
        return AppError::Conflict(DUPLICATE_KEY_MESSAGE.to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
