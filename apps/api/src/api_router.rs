use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use masterhub_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::api_config::ApiConfig;
use crate::handlers::{partners, product_categories, products, tenants};
use crate::state::AppState;
use crate::{auth, handlers, middleware};

pub fn build_router(
    app_state: AppState,
    config: &ApiConfig,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let import_routes = Router::new()
        .route(
            "/api/partners/import",
            post(partners::import_partners_handler),
        )
        .layer(DefaultBodyLimit::max(config.csv_import_max_bytes));

    let protected_routes = Router::new()
        .route(
            "/api/partners",
            get(partners::list_partners_handler).post(partners::create_partner_handler),
        )
        .route(
            "/api/partners/export",
            get(partners::export_partners_handler),
        )
        .route(
            "/api/partners/{partner_id}",
            get(partners::get_partner_handler)
                .put(partners::update_partner_handler)
                .delete(partners::delete_partner_handler),
        )
        .route(
            "/api/partners/{partner_id}/restore",
            post(partners::restore_partner_handler),
        )
        .merge(import_routes)
        .route(
            "/api/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route(
            "/api/products/export",
            get(products::export_products_handler),
        )
        .route(
            "/api/products/{product_id}",
            get(products::get_product_handler)
                .put(products::update_product_handler)
                .delete(products::delete_product_handler),
        )
        .route(
            "/api/products/{product_id}/restore",
            post(products::restore_product_handler),
        )
        .route(
            "/api/product-categories",
            get(product_categories::list_product_categories_handler)
                .post(product_categories::create_product_category_handler),
        )
        .route(
            "/api/product-categories/choices",
            get(product_categories::product_category_choices_handler),
        )
        .route(
            "/api/product-categories/{category_id}",
            get(product_categories::get_product_category_handler)
                .put(product_categories::update_product_category_handler)
                .delete(product_categories::delete_product_category_handler),
        )
        .route(
            "/api/product-categories/{category_id}/restore",
            post(product_categories::restore_product_category_handler),
        )
        .route(
            "/api/tenants",
            get(tenants::list_tenants_handler).post(tenants::create_tenant_handler),
        )
        .route(
            "/api/tenants/{tenant_id}",
            get(tenants::get_tenant_handler)
                .put(tenants::update_tenant_handler)
                .delete(tenants::delete_tenant_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/restore",
            post(tenants::restore_tenant_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/me", get(auth::me_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}

fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]))
}
