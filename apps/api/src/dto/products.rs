use masterhub_core::AppError;
use masterhub_domain::{Product, ProductCategory, ProductCategoryInput, ProductInput};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::AuditResponse;
use super::listing::parse_optional_category_id;

/// Incoming payload for product creation and update.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-request.ts"
)]
pub struct ProductRequest {
    pub product_name: Option<String>,
    pub product_category_id: Option<String>,
    pub unit: Option<String>,
    /// Decimal text, e.g. `"1200.50"`.
    pub unit_price: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<ProductRequest> for ProductInput {
    type Error = AppError;

    fn try_from(request: ProductRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            product_name: request.product_name,
            product_category_id: parse_optional_category_id(
                request.product_category_id.as_deref(),
            )?,
            unit: request.unit,
            unit_price: request.unit_price,
            description: request.description,
        })
    }
}

/// API representation of a product.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-response.ts"
)]
pub struct ProductResponse {
    pub id: String,
    pub product_name: String,
    pub product_category_id: Option<String>,
    pub product_category_name: Option<String>,
    pub unit: Option<String>,
    pub unit_price: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub audit: AuditResponse,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let data = product.data();
        Self {
            id: product.id().to_string(),
            product_name: data.product_name().to_owned(),
            product_category_id: data.product_category_id().map(|id| id.to_string()),
            product_category_name: product.product_category_name().map(ToOwned::to_owned),
            unit: data.unit().map(ToOwned::to_owned),
            unit_price: data.unit_price().to_string(),
            description: data.description().map(ToOwned::to_owned),
            audit: AuditResponse::from(product.audit()),
        }
    }
}

/// Incoming payload for product category creation and update.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-category-request.ts"
)]
pub struct ProductCategoryRequest {
    pub product_category_name: Option<String>,
    pub sort: Option<i32>,
}

impl From<ProductCategoryRequest> for ProductCategoryInput {
    fn from(request: ProductCategoryRequest) -> Self {
        Self {
            product_category_name: request.product_category_name,
            sort: request.sort,
        }
    }
}

/// API representation of a product category.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-category-response.ts"
)]
pub struct ProductCategoryResponse {
    pub id: String,
    pub product_category_name: String,
    pub sort: i32,
    #[serde(flatten)]
    pub audit: AuditResponse,
}

impl From<ProductCategory> for ProductCategoryResponse {
    fn from(category: ProductCategory) -> Self {
        Self {
            id: category.id().to_string(),
            product_category_name: category.data().product_category_name().to_owned(),
            sort: category.data().sort(),
            audit: AuditResponse::from(category.audit()),
        }
    }
}

/// Selectable category offered by product forms.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-category-choice-response.ts"
)]
pub struct ProductCategoryChoiceResponse {
    pub id: String,
    pub product_category_name: String,
}

impl From<ProductCategory> for ProductCategoryChoiceResponse {
    fn from(category: ProductCategory) -> Self {
        Self {
            id: category.id().to_string(),
            product_category_name: category.data().product_category_name().to_owned(),
        }
    }
}
