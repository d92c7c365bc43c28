use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use masterhub_core::{AppError, AppResult, TenantId, UserIdentity};
use masterhub_domain::{
    Ordering, ProductCategory, ProductCategoryId, ProductCategoryInput, RecordAudit,
};

use crate::{ListQuery, Page, ascending};

/// Fields a category list may be ordered by.
pub const PRODUCT_CATEGORY_ORDERING_FIELDS: &[&str] = &[
    "product_category_name",
    "sort",
    "created_at",
    "updated_at",
];

const DEFAULT_ORDERING: Ordering = ascending("product_category_name");

/// Repository port for product categories.
#[async_trait]
pub trait ProductCategoryRepository: Send + Sync {
    /// Returns one page of categories matching the query.
    async fn list(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        ordering: Ordering,
    ) -> AppResult<Page<ProductCategory>>;

    /// Returns active categories ordered by sort key and name.
    async fn list_active(&self, tenant_id: TenantId) -> AppResult<Vec<ProductCategory>>;

    /// Finds a category, including soft-deleted ones.
    async fn find(
        &self,
        tenant_id: TenantId,
        category_id: ProductCategoryId,
    ) -> AppResult<Option<ProductCategory>>;

    /// Inserts a category. Fails with `AppError::Conflict` on a duplicate name.
    async fn create(&self, category: ProductCategory) -> AppResult<()>;

    /// Overwrites a category. Fails with `AppError::Conflict` on a duplicate name.
    async fn update(&self, category: ProductCategory) -> AppResult<()>;
}

/// Application service for product categories.
#[derive(Clone)]
pub struct ProductCategoryService {
    repository: Arc<dyn ProductCategoryRepository>,
}

impl ProductCategoryService {
    /// Creates a category service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn ProductCategoryRepository>) -> Self {
        Self { repository }
    }

    /// Lists categories of the actor's tenant.
    pub async fn list(
        &self,
        actor: &UserIdentity,
        query: &ListQuery,
    ) -> AppResult<Page<ProductCategory>> {
        let ordering = query.resolve_ordering(PRODUCT_CATEGORY_ORDERING_FIELDS, DEFAULT_ORDERING);
        self.repository
            .list(actor.tenant_id(), query, ordering)
            .await
    }

    /// Returns the active categories offered when editing a product.
    pub async fn choices(&self, actor: &UserIdentity) -> AppResult<Vec<ProductCategory>> {
        self.repository.list_active(actor.tenant_id()).await
    }

    /// Returns one category of the actor's tenant.
    pub async fn get(
        &self,
        actor: &UserIdentity,
        category_id: ProductCategoryId,
    ) -> AppResult<ProductCategory> {
        self.repository
            .find(actor.tenant_id(), category_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("product category '{category_id}' does not exist"))
            })
    }

    /// Validates and stores a new category.
    pub async fn create(
        &self,
        actor: &UserIdentity,
        input: ProductCategoryInput,
    ) -> AppResult<ProductCategory> {
        let category = ProductCategory::new(
            ProductCategoryId::new(),
            actor.tenant_id(),
            input.validate()?,
            RecordAudit::created(actor.subject(), Utc::now()),
        );
        self.repository.create(category.clone()).await?;
        Ok(category)
    }

    /// Replaces the attributes of a category.
    pub async fn update(
        &self,
        actor: &UserIdentity,
        category_id: ProductCategoryId,
        input: ProductCategoryInput,
    ) -> AppResult<ProductCategory> {
        let existing = self.get(actor, category_id).await?;
        let data = input.validate()?;
        let audit = existing
            .audit()
            .touched(actor.subject(), Utc::now(), existing.audit().is_deleted());
        let category = existing.with_data(data).with_audit(audit);
        self.repository.update(category.clone()).await?;
        Ok(category)
    }

    /// Soft-deletes a category. Products keep their reference.
    pub async fn delete(
        &self,
        actor: &UserIdentity,
        category_id: ProductCategoryId,
    ) -> AppResult<()> {
        self.set_deleted(actor, category_id, true).await.map(|_| ())
    }

    /// Clears the soft-delete flag of a category.
    pub async fn restore(
        &self,
        actor: &UserIdentity,
        category_id: ProductCategoryId,
    ) -> AppResult<ProductCategory> {
        self.set_deleted(actor, category_id, false).await
    }

    async fn set_deleted(
        &self,
        actor: &UserIdentity,
        category_id: ProductCategoryId,
        is_deleted: bool,
    ) -> AppResult<ProductCategory> {
        let existing = self.get(actor, category_id).await?;
        let audit = existing
            .audit()
            .touched(actor.subject(), Utc::now(), is_deleted);
        let category = existing.with_audit(audit);
        self.repository.update(category.clone()).await?;
        Ok(category)
    }
}
