use masterhub_application::csv_import::CsvDelimiter;
use masterhub_application::{
    AuthService, PartnerService, ProductCategoryService, ProductService, TenantService,
};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub partner_service: PartnerService,
    pub product_service: ProductService,
    pub product_category_service: ProductCategoryService,
    pub tenant_service: TenantService,
    pub postgres_pool: PgPool,
    pub frontend_url: String,
    /// Delimiter used when an import request does not name one.
    pub csv_import_delimiter: CsvDelimiter,
}
