use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use masterhub_core::{AppError, AppResult, TenantId, UserIdentity};
use masterhub_domain::{
    Ordering, Product, ProductCategory, ProductCategoryId, ProductCategoryInput, ProductId,
    ProductInput,
};

use super::{PRODUCT_CSV_HEADERS, ProductRepository, ProductService};
use crate::{ListQuery, Page, ProductCategoryRepository, ProductCategoryService};

#[derive(Default)]
struct FakeProductRepository {
    products: Mutex<HashMap<ProductId, Product>>,
}

impl FakeProductRepository {
    async fn matching(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        category_id: Option<ProductCategoryId>,
    ) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .lock()
            .await
            .values()
            .filter(|product| product.tenant_id() == tenant_id)
            .filter(|product| query.include_deleted || !product.audit().is_deleted())
            .filter(|product| {
                category_id.is_none() || product.data().product_category_id() == category_id
            })
            .cloned()
            .collect();
        products.sort_by(|left, right| left.data().product_name().cmp(right.data().product_name()));
        products
    }
}

#[async_trait]
impl ProductRepository for FakeProductRepository {
    async fn list(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        category_id: Option<ProductCategoryId>,
        _ordering: Ordering,
    ) -> AppResult<Page<Product>> {
        let items = self.matching(tenant_id, query, category_id).await;
        Ok(Page {
            count: items.len() as u64,
            items,
        })
    }

    async fn list_all(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        category_id: Option<ProductCategoryId>,
        _ordering: Ordering,
    ) -> AppResult<Vec<Product>> {
        Ok(self.matching(tenant_id, query, category_id).await)
    }

    async fn find(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> AppResult<Option<Product>> {
        Ok(self
            .products
            .lock()
            .await
            .get(&product_id)
            .filter(|product| product.tenant_id() == tenant_id)
            .cloned())
    }

    async fn create(&self, product: &Product) -> AppResult<()> {
        self.update(product).await
    }

    async fn update(&self, product: &Product) -> AppResult<()> {
        let mut products = self.products.lock().await;
        let name_taken = products.values().any(|stored| {
            stored.tenant_id() == product.tenant_id()
                && stored.id() != product.id()
                && stored.data().product_name() == product.data().product_name()
        });
        if name_taken {
            return Err(AppError::Conflict(
                "a product with the same name is already registered".to_owned(),
            ));
        }
        products.insert(product.id(), product.clone());
        Ok(())
    }
}

#[derive(Default)]
struct FakeProductCategoryRepository {
    categories: Mutex<HashMap<ProductCategoryId, ProductCategory>>,
}

#[async_trait]
impl ProductCategoryRepository for FakeProductCategoryRepository {
    async fn list(
        &self,
        tenant_id: TenantId,
        _query: &ListQuery,
        _ordering: Ordering,
    ) -> AppResult<Page<ProductCategory>> {
        let items = self.list_active(tenant_id).await?;
        Ok(Page {
            count: items.len() as u64,
            items,
        })
    }

    async fn list_active(&self, tenant_id: TenantId) -> AppResult<Vec<ProductCategory>> {
        Ok(self
            .categories
            .lock()
            .await
            .values()
            .filter(|category| {
                category.tenant_id() == tenant_id && !category.audit().is_deleted()
            })
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        tenant_id: TenantId,
        category_id: ProductCategoryId,
    ) -> AppResult<Option<ProductCategory>> {
        Ok(self
            .categories
            .lock()
            .await
            .get(&category_id)
            .filter(|category| category.tenant_id() == tenant_id)
            .cloned())
    }

    async fn create(&self, category: ProductCategory) -> AppResult<()> {
        self.update(category).await
    }

    async fn update(&self, category: ProductCategory) -> AppResult<()> {
        self.categories
            .lock()
            .await
            .insert(category.id(), category);
        Ok(())
    }
}

struct Fixture {
    products: ProductService,
    categories: ProductCategoryService,
}

fn fixture() -> Fixture {
    let category_repository = Arc::new(FakeProductCategoryRepository::default());
    Fixture {
        products: ProductService::new(
            Arc::new(FakeProductRepository::default()),
            category_repository.clone(),
        ),
        categories: ProductCategoryService::new(category_repository),
    }
}

fn actor(tenant_id: TenantId) -> UserIdentity {
    UserIdentity::new("alice", "Alice", None, tenant_id)
}

fn product(name: &str, price: &str, category_id: Option<ProductCategoryId>) -> ProductInput {
    ProductInput {
        product_name: Some(name.to_owned()),
        product_category_id: category_id,
        unit: Some("box".to_owned()),
        unit_price: Some(price.to_owned()),
        description: None,
    }
}

async fn category(
    fixture: &Fixture,
    actor: &UserIdentity,
    name: &str,
) -> AppResult<ProductCategoryId> {
    let created = fixture
        .categories
        .create(
            actor,
            ProductCategoryInput {
                product_category_name: Some(name.to_owned()),
                sort: None,
            },
        )
        .await?;
    Ok(created.id())
}

#[tokio::test]
async fn product_resolves_its_category_name() -> AppResult<()> {
    let fixture = fixture();
    let actor = actor(TenantId::new());
    let food = category(&fixture, &actor, "Food").await?;

    let created = fixture
        .products
        .create(&actor, product("Rice", "1200.5", Some(food)))
        .await?;
    assert_eq!(created.product_category_name(), Some("Food"));
    assert_eq!(created.data().unit_price().as_str(), "1200.50");
    Ok(())
}

#[tokio::test]
async fn category_of_another_tenant_is_rejected() -> AppResult<()> {
    let fixture = fixture();
    let foreign = category(&fixture, &actor(TenantId::new()), "Food").await?;

    let result = fixture
        .products
        .create(&actor(TenantId::new()), product("Rice", "10", Some(foreign)))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn deleted_category_cannot_be_assigned_but_can_be_kept() -> AppResult<()> {
    let fixture = fixture();
    let actor = actor(TenantId::new());
    let food = category(&fixture, &actor, "Food").await?;
    let rice = fixture
        .products
        .create(&actor, product("Rice", "10", Some(food)))
        .await?;
    fixture.categories.delete(&actor, food).await?;

    let rejected = fixture
        .products
        .create(&actor, product("Bread", "5", Some(food)))
        .await;
    assert!(matches!(rejected, Err(AppError::Validation(_))));

    let kept = fixture
        .products
        .update(&actor, rice.id(), product("Rice", "11", Some(food)))
        .await?;
    assert_eq!(kept.product_category_name(), Some("Food"));
    Ok(())
}

#[tokio::test]
async fn list_filters_by_category() -> AppResult<()> {
    let fixture = fixture();
    let actor = actor(TenantId::new());
    let food = category(&fixture, &actor, "Food").await?;
    fixture
        .products
        .create(&actor, product("Rice", "10", Some(food)))
        .await?;
    fixture
        .products
        .create(&actor, product("Pen", "2", None))
        .await?;

    let page = fixture
        .products
        .list(&actor, &ListQuery::default(), Some(food))
        .await?;
    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].data().product_name(), "Rice");
    Ok(())
}

#[tokio::test]
async fn export_renders_category_price_and_deleted_flag() -> AppResult<()> {
    let fixture = fixture();
    let actor = actor(TenantId::new());
    let food = category(&fixture, &actor, "Food").await?;
    fixture
        .products
        .create(&actor, product("Rice", "10", Some(food)))
        .await?;
    let pen = fixture
        .products
        .create(&actor, product("Pen", "2.5", None))
        .await?;
    fixture.products.delete(&actor, pen.id()).await?;

    let document = fixture
        .products
        .export_products(
            &actor,
            &ListQuery {
                include_deleted: true,
                ..ListQuery::default()
            },
            None,
        )
        .await?;

    assert_eq!(document.headers(), PRODUCT_CSV_HEADERS);
    assert_eq!(
        document.rows(),
        [
            vec![
                "Pen".to_owned(),
                String::new(),
                "box".to_owned(),
                "2.50".to_owned(),
                String::new(),
                "1".to_owned()
            ],
            vec![
                "Rice".to_owned(),
                "Food".to_owned(),
                "box".to_owned(),
                "10.00".to_owned(),
                String::new(),
                "0".to_owned()
            ],
        ]
    );
    Ok(())
}
