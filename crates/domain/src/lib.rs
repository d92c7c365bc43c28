//! Domain entities and field rules for master data.

#![forbid(unsafe_code)]

mod field_rules;
mod listing;
mod partner;
mod product;
mod record;
mod tenant;
mod user;

pub use field_rules::{EMAIL_MAX_LENGTH, FieldError, FieldErrors, is_valid_email};
pub use listing::{Ordering, SortDirection};
pub use partner::{Partner, PartnerData, PartnerId, PartnerInput, PartnerKey, PartnerType};
pub use product::{
    Product, ProductCategory, ProductCategoryData, ProductCategoryId, ProductCategoryInput,
    ProductData, ProductId, ProductInput, UNIT_PRICE_FRACTION_DIGITS, UNIT_PRICE_INTEGER_DIGITS,
    UnitPrice,
};
pub use record::RecordAudit;
pub use tenant::{Tenant, TenantData, TenantInput};
pub use user::{EmailAddress, UserId};
