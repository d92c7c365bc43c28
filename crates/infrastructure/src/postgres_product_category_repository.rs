use async_trait::async_trait;
use chrono::{DateTime, Utc};
use masterhub_application::{ListQuery, Page, ProductCategoryRepository};
use masterhub_core::{AppError, AppResult, TenantId};
use masterhub_domain::{
    Ordering, ProductCategory, ProductCategoryId, ProductCategoryInput, RecordAudit,
};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::postgres_listing::{
    fetch_count, is_unique_violation, push_list_filters, push_ordering, push_page,
};

const CATEGORY_COLUMNS: &str = "product_categories.id, product_categories.tenant_id, \
    product_categories.product_category_name, product_categories.sort, \
    product_categories.is_deleted, product_categories.created_at, product_categories.created_by, \
    product_categories.updated_at, product_categories.updated_by";

/// PostgreSQL-backed product category repository.
#[derive(Clone)]
pub struct PostgresProductCategoryRepository {
    pool: PgPool,
}

impl PostgresProductCategoryRepository {
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
            "SELECT {select} FROM product_categories WHERE product_categories.tenant_id = "
        ));
        builder.push_bind(tenant_id.as_uuid());
        push_list_filters(
            &mut builder,
            "product_categories",
            query,
            &["product_category_name"],
        );
        builder
    }
}

#[derive(Debug, FromRow)]
struct ProductCategoryRow {
    id: Uuid,
    tenant_id: Uuid,
    product_category_name: String,
    sort: i32,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: DateTime<Utc>,
    updated_by: String,
}

impl TryFrom<ProductCategoryRow> for ProductCategory {
    type Error = AppError;

    fn try_from(row: ProductCategoryRow) -> Result<Self, Self::Error> {
        let data = ProductCategoryInput {
            product_category_name: Some(row.product_category_name),
            sort: Some(row.sort),
        }
        .validate()
        .map_err(|errors| {
            AppError::Internal(format!(
                "stored product category '{}' is invalid: {errors}",
                row.id
            ))
        })?;

        Ok(ProductCategory::new(
            ProductCategoryId::from_uuid(row.id),
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

fn category_write_error(error: &sqlx::Error, operation: &str) -> AppError {
    if is_unique_violation(error) {
        return AppError::Conflict(
            "a product category with the same name is already registered".to_owned(),
        );
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

#[async_trait]
impl ProductCategoryRepository for PostgresProductCategoryRepository {
    async fn list(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        ordering: Ordering,
    ) -> AppResult<Page<ProductCategory>> {
        let count = fetch_count(
            Self::filtered("COUNT(*)", tenant_id, query),
            &self.pool,
            "product categories",
        )
        .await?;

        let mut builder = Self::filtered(CATEGORY_COLUMNS, tenant_id, query);
        push_ordering(&mut builder, "product_categories", ordering);
        push_page(&mut builder, query);
        let rows = builder
            .build_query_as::<ProductCategoryRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list product categories: {error}"))
            })?;

        let items = rows
            .into_iter()
            .map(ProductCategory::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Page { items, count })
    }

    async fn list_active(&self, tenant_id: TenantId) -> AppResult<Vec<ProductCategory>> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM product_categories \
             WHERE product_categories.tenant_id = $1 AND product_categories.is_deleted = FALSE \
             ORDER BY product_categories.sort, product_categories.product_category_name"
        );
        let rows = sqlx::query_as::<_, ProductCategoryRow>(&sql)
            .bind(tenant_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to list active product categories: {error}"
                ))
            })?;

        rows.into_iter().map(ProductCategory::try_from).collect()
    }

    async fn find(
        &self,
        tenant_id: TenantId,
        category_id: ProductCategoryId,
    ) -> AppResult<Option<ProductCategory>> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM product_categories \
             WHERE product_categories.tenant_id = $1 AND product_categories.id = $2"
        );
        let row = sqlx::query_as::<_, ProductCategoryRow>(&sql)
            .bind(tenant_id.as_uuid())
            .bind(category_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to find product category '{category_id}': {error}"
                ))
            })?;

        row.map(ProductCategory::try_from).transpose()
    }

    async fn create(&self, category: ProductCategory) -> AppResult<()> {
        let audit = category.audit();
        sqlx::query(
            r#"
            INSERT INTO product_categories (
                id, tenant_id, product_category_name, sort,
                is_deleted, created_at, created_by, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(category.id().as_uuid())
        .bind(category.tenant_id().as_uuid())
        .bind(category.data().product_category_name())
        .bind(category.data().sort())
        .bind(audit.is_deleted())
        .bind(audit.created_at())
        .bind(audit.created_by())
        .bind(audit.updated_at())
        .bind(audit.updated_by())
        .execute(&self.pool)
        .await
        .map_err(|error| category_write_error(&error, "create product category"))?;

        Ok(())
    }

    async fn update(&self, category: ProductCategory) -> AppResult<()> {
        let audit = category.audit();
        let result = sqlx::query(
            r#"
            UPDATE product_categories
            SET product_category_name = $3,
                sort = $4,
                is_deleted = $5,
                updated_at = $6,
                updated_by = $7
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(category.tenant_id().as_uuid())
        .bind(category.id().as_uuid())
        .bind(category.data().product_category_name())
        .bind(category.data().sort())
        .bind(audit.is_deleted())
        .bind(audit.updated_at())
        .bind(audit.updated_by())
        .execute(&self.pool)
        .await
        .map_err(|error| category_write_error(&error, "update product category"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "product category '{}' does not exist",
                category.id()
            )));
        }

        Ok(())
    }
}
