use async_trait::async_trait;
use chrono::{DateTime, Utc};
use masterhub_application::{ListQuery, Page, ProductRepository};
use masterhub_core::{AppError, AppResult, TenantId};
use masterhub_domain::{
    Ordering, Product, ProductCategoryId, ProductId, ProductInput, RecordAudit,
};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::postgres_listing::{
    fetch_count, is_unique_violation, push_list_filters, push_ordering, push_page,
};


const PRODUCT_COLUMNS: &str = "products.id, products.tenant_id, products.product_name, \
    products.product_category_id, product_categories.product_category_name, products.unit, \
    products.unit_price::text AS unit_price, products.description, products.is_deleted, \
    products.created_at, products.created_by, products.updated_at, products.updated_by";

const PRODUCT_SOURCE: &str = "products LEFT JOIN product_categories \
    ON product_categories.id = products.product_category_id";

/// PostgreSQL-backed product repository. Products are loaded with their category name.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn filtered(
        select: &str,
        tenant_id: TenantId,
        query: &ListQuery,
        category_id: Option<ProductCategoryId>,
    ) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {select} FROM {PRODUCT_SOURCE} WHERE products.tenant_id = "
        ));
        builder.push_bind(tenant_id.as_uuid());
        if let Some(category_id) = category_id {
            builder.push(" AND products.product_category_id = ");
            builder.push_bind(category_id.as_uuid());
        }
        push_list_filters(
            &mut builder,
            "products",
            query,
            &["product_name", "description"],
        );
        builder
    }

    async fn fetch_products(
        &self,
        mut builder: QueryBuilder<'_, Postgres>,
    ) -> AppResult<Vec<Product>> {
        let rows = builder
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list products: {error}")))?;

        rows.into_iter().map(Product::try_from).collect()
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    tenant_id: Uuid,
    product_name: String,
    product_category_id: Option<Uuid>,
    product_category_name: Option<String>,
    unit: Option<String>,
    unit_price: String,
    description: Option<String>,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: DateTime<Utc>,
    updated_by: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let data = ProductInput {
            product_name: Some(row.product_name),
            product_category_id: row.product_category_id.map(ProductCategoryId::from_uuid),
            unit: row.unit,
            unit_price: Some(row.unit_price),
            description: row.description,
        }
        .validate()
        .map_err(|errors| {
            AppError::Internal(format!("stored product '{}' is invalid: {errors}", row.id))
        })?;

        Ok(Product::new(
            ProductId::from_uuid(row.id),
            TenantId::from_uuid(row.tenant_id),
            data,
            row.product_category_name,
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

fn product_write_error(error: &sqlx::Error, operation: &str) -> AppError {
    if is_unique_violation(error) {
        return AppError::Conflict("a product with the same name is already registered".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn list(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        category_id: Option<ProductCategoryId>,
        ordering: Ordering,
    ) -> AppResult<Page<Product>> {
        let count = fetch_count(
            Self::filtered("COUNT(*)", tenant_id, query, category_id),
            &self.pool,
            "products",
        )
        .await?;

        let mut builder = Self::filtered(PRODUCT_COLUMNS, tenant_id, query, category_id);
        push_ordering(&mut builder, "products", ordering);
        push_page(&mut builder, query);
        let items = self.fetch_products(builder).await?;

        Ok(Page { items, count })
    }

    async fn list_all(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        category_id: Option<ProductCategoryId>,
        ordering: Ordering,
    ) -> AppResult<Vec<Product>> {
        let mut builder = Self::filtered(PRODUCT_COLUMNS, tenant_id, query, category_id);
        push_ordering(&mut builder, "products", ordering);
        self.fetch_products(builder).await
    }

    async fn find(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> AppResult<Option<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM {PRODUCT_SOURCE} \
             WHERE products.tenant_id = $1 AND products.id = $2"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(tenant_id.as_uuid())
            .bind(product_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to find product '{product_id}': {error}"))
            })?;

        row.map(Product::try_from).transpose()
    }

    async fn create(&self, product: &Product) -> AppResult<()> {
        let data = product.data();
        let audit = product.audit();
        sqlx::query(
            r#"
            INSERT INTO products (
                id, tenant_id, product_name, product_category_id, unit, unit_price,
                description, is_deleted, created_at, created_by, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6::numeric, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(product.id().as_uuid())
        .bind(product.tenant_id().as_uuid())
        .bind(data.product_name())
        .bind(data.product_category_id().map(|id| id.as_uuid()))
        .bind(data.unit())
        .bind(data.unit_price().as_str())
        .bind(data.description())
        .bind(audit.is_deleted())
        .bind(audit.created_at())
        .bind(audit.created_by())
        .bind(audit.updated_at())
        .bind(audit.updated_by())
        .execute(&self.pool)
        .await
        .map_err(|error| product_write_error(&error, "create product"))?;

        Ok(())
    }

    async fn update(&self, product: &Product) -> AppResult<()> {
        let data = product.data();
        let audit = product.audit();
        let result = sqlx::query(
            r#"
            UPDATE products
            SET product_name = $3,
                product_category_id = $4,
                unit = $5,
                unit_price = $6::numeric,
                description = $7,
                is_deleted = $8,
                updated_at = $9,
                updated_by = $10
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(product.tenant_id().as_uuid())
        .bind(product.id().as_uuid())
        .bind(data.product_name())
        .bind(data.product_category_id().map(|id| id.as_uuid()))
        .bind(data.unit())
        .bind(data.unit_price().as_str())
        .bind(data.description())
        .bind(audit.is_deleted())
        .bind(audit.updated_at())
        .bind(audit.updated_by())
        .execute(&self.pool)
        .await
        .map_err(|error| product_write_error(&error, "update product"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "product '{}' does not exist",
                product.id()
            )));
        }

        Ok(())
    }
}
