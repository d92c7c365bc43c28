use async_trait::async_trait;
use masterhub_core::{AppResult, TenantId};
use masterhub_domain::{Ordering, Product, ProductCategoryId, ProductId};

use crate::{ListQuery, Page};

/// Repository port for products. Loaded products carry their category name.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Returns one page of products, optionally limited to one category.
    async fn list(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        category_id: Option<ProductCategoryId>,
        ordering: Ordering,
    ) -> AppResult<Page<Product>>;

    /// Returns every matching product, ignoring paging.
    async fn list_all(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        category_id: Option<ProductCategoryId>,
        ordering: Ordering,
    ) -> AppResult<Vec<Product>>;

    /// Finds a product, including soft-deleted ones.
    async fn find(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> AppResult<Option<Product>>;

    /// Inserts a product. Fails with `AppError::Conflict` on a duplicate name.
    async fn create(&self, product: &Product) -> AppResult<()>;

    /// Overwrites a product. Fails with `AppError::Conflict` on a duplicate name.
    async fn update(&self, product: &Product) -> AppResult<()>;
}
