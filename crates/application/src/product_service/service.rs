use std::sync::Arc;

use chrono::Utc;
use masterhub_core::{AppError, AppResult, UserIdentity};
use masterhub_domain::{
    Ordering, Product, ProductCategoryId, ProductData, ProductId, ProductInput, RecordAudit,
};

use super::ProductRepository;
use crate::csv_import::CsvDocument;
use crate::{ListQuery, Page, ProductCategoryRepository, descending};

/// Fields a product list may be ordered by.
pub const PRODUCT_ORDERING_FIELDS: &[&str] =
    &["product_name", "unit_price", "created_at", "updated_at"];

/// Column headers of product exports.
pub const PRODUCT_CSV_HEADERS: &[&str] = &[
    "Product Name",
    "Product Category",
    "Unit",
    "Unit Price",
    "Description",
    "Deleted",
];

/// File name prefix of product exports.
pub const PRODUCT_EXPORT_FILE_PREFIX: &str = "products";

const DEFAULT_ORDERING: Ordering = descending("created_at");

/// Application service for products.
#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    category_repository: Arc<dyn ProductCategoryRepository>,
}

impl ProductService {
    /// Creates a product service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        category_repository: Arc<dyn ProductCategoryRepository>,
    ) -> Self {
        Self {
            repository,
            category_repository,
        }
    }

    /// Lists products, optionally filtered by category.
    pub async fn list(
        &self,
        actor: &UserIdentity,
        query: &ListQuery,
        category_id: Option<ProductCategoryId>,
    ) -> AppResult<Page<Product>> {
        let ordering = query.resolve_ordering(PRODUCT_ORDERING_FIELDS, DEFAULT_ORDERING);
        self.repository
            .list(actor.tenant_id(), query, category_id, ordering)
            .await
    }

    /// Returns one product of the actor's tenant.
    pub async fn get(&self, actor: &UserIdentity, product_id: ProductId) -> AppResult<Product> {
        self.repository
            .find(actor.tenant_id(), product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product '{product_id}' does not exist")))
    }

    /// Validates and stores a new product.
    pub async fn create(&self, actor: &UserIdentity, input: ProductInput) -> AppResult<Product> {
        let data = input.validate()?;
        let category_name = self.active_category_name(actor, &data).await?;

        let product = Product::new(
            ProductId::new(),
            actor.tenant_id(),
            data,
            category_name,
            RecordAudit::created(actor.subject(), Utc::now()),
        );
        self.repository.create(&product).await?;
        Ok(product)
    }

    /// Replaces the attributes of a product.
    ///
    /// A product may keep a category that was deleted after it was assigned.
    pub async fn update(
        &self,
        actor: &UserIdentity,
        product_id: ProductId,
        input: ProductInput,
    ) -> AppResult<Product> {
        let existing = self.get(actor, product_id).await?;
        let data = input.validate()?;

        let category_name =
            if data.product_category_id() == existing.data().product_category_id() {
                existing.product_category_name().map(ToOwned::to_owned)
            } else {
                self.active_category_name(actor, &data).await?
            };

        let audit = existing
            .audit()
            .touched(actor.subject(), Utc::now(), existing.audit().is_deleted());
        let product = existing.with_data(data, category_name).with_audit(audit);
        self.repository.update(&product).await?;
        Ok(product)
    }

    /// Soft-deletes a product.
    pub async fn delete(&self, actor: &UserIdentity, product_id: ProductId) -> AppResult<()> {
        self.set_deleted(actor, product_id, true).await.map(|_| ())
    }

    /// Clears the soft-delete flag of a product.
    pub async fn restore(&self, actor: &UserIdentity, product_id: ProductId) -> AppResult<Product> {
        self.set_deleted(actor, product_id, false).await
    }

    /// Renders every matching product as CSV.
    pub async fn export_products(
        &self,
        actor: &UserIdentity,
        query: &ListQuery,
        category_id: Option<ProductCategoryId>,
    ) -> AppResult<CsvDocument> {
        let ordering = query.resolve_ordering(PRODUCT_ORDERING_FIELDS, DEFAULT_ORDERING);
        let products = self
            .repository
            .list_all(actor.tenant_id(), query, category_id, ordering)
            .await?;

        let mut document = CsvDocument::new(
            PRODUCT_CSV_HEADERS
                .iter()
                .map(|header| (*header).to_owned())
                .collect(),
        );
        for product in &products {
            let data = product.data();
            document.push_row(vec![
                data.product_name().to_owned(),
                product.product_category_name().unwrap_or_default().to_owned(),
                data.unit().unwrap_or_default().to_owned(),
                data.unit_price().to_string(),
                data.description().unwrap_or_default().to_owned(),
                if product.audit().is_deleted() { "1" } else { "0" }.to_owned(),
            ]);
        }

        Ok(document)
    }

    async fn active_category_name(
        &self,
        actor: &UserIdentity,
        data: &ProductData,
    ) -> AppResult<Option<String>> {
        let Some(category_id) = data.product_category_id() else {
            return Ok(None);
        };

        match self
            .category_repository
            .find(actor.tenant_id(), category_id)
            .await?
        {
            Some(category) if !category.audit().is_deleted() => Ok(Some(
                category.data().product_category_name().to_owned(),
            )),
            _ => Err(AppError::Validation(
                "product_category: select a valid choice; that category is not available"
                    .to_owned(),
            )),
        }
    }

    async fn set_deleted(
        &self,
        actor: &UserIdentity,
        product_id: ProductId,
        is_deleted: bool,
    ) -> AppResult<Product> {
        let existing = self.get(actor, product_id).await?;
        let audit = existing
            .audit()
            .touched(actor.subject(), Utc::now(), is_deleted);
        let product = existing.with_audit(audit);
        self.repository.update(&product).await?;
        Ok(product)
    }
}
