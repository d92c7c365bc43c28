use std::sync::Arc;

use masterhub_application::{
    AuthService, PartnerService, ProductCategoryService, ProductService, TenantService,
};
use masterhub_infrastructure::{
    Argon2PasswordHasher, PostgresPartnerRepository, PostgresProductCategoryRepository,
    PostgresProductRepository, PostgresTenantRepository, PostgresUserRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let category_repository = Arc::new(PostgresProductCategoryRepository::new(pool.clone()));

    AppState {
        auth_service: AuthService::new(
            Arc::new(PostgresUserRepository::new(pool.clone())),
            Arc::new(Argon2PasswordHasher::new()),
        ),
        partner_service: PartnerService::new(Arc::new(PostgresPartnerRepository::new(
            pool.clone(),
        ))),
        product_service: ProductService::new(
            Arc::new(PostgresProductRepository::new(pool.clone())),
            category_repository.clone(),
        ),
        product_category_service: ProductCategoryService::new(category_repository),
        tenant_service: TenantService::new(Arc::new(PostgresTenantRepository::new(pool.clone()))),
        postgres_pool: pool,
        frontend_url: config.frontend_url.clone(),
        csv_import_delimiter: config.csv_import_delimiter,
    }
}
