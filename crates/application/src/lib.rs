//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_service;
pub mod csv_import;
mod listing;
mod partner_service;
mod product_category_service;
mod product_service;
mod tenant_service;

pub use auth_service::{
    AuthService, INVALID_CREDENTIALS_MESSAGE, NewUser, PasswordHasher, UserRecord, UserRepository,
};
pub use listing::{DEFAULT_PAGE_SIZE, ListQuery, MAX_PAGE_SIZE, Page, ascending, descending};
pub use partner_service::{
    PARTNER_CSV_HEADERS, PARTNER_EXPORT_FILE_PREFIX, PARTNER_IMPORT_ERROR_PREFIX,
    PARTNER_ORDERING_FIELDS, PartnerImportProfile, PartnerRepository, PartnerService,
};
pub use product_category_service::{
    PRODUCT_CATEGORY_ORDERING_FIELDS, ProductCategoryRepository, ProductCategoryService,
};
pub use product_service::{
    PRODUCT_CSV_HEADERS, PRODUCT_EXPORT_FILE_PREFIX, PRODUCT_ORDERING_FIELDS, ProductRepository,
    ProductService,
};
pub use tenant_service::{TENANT_ORDERING_FIELDS, TenantRepository, TenantService};
