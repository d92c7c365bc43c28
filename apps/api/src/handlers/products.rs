use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use chrono::Local;
use masterhub_application::PRODUCT_EXPORT_FILE_PREFIX;
use masterhub_application::csv_import::timestamped_file_name;
use masterhub_core::UserIdentity;
use masterhub_domain::{ProductId, ProductInput};
use uuid::Uuid;

use crate::dto::{ListParams, ListResponse, ProductFilterParams, ProductRequest, ProductResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::csv_download::csv_attachment;

pub async fn list_products_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<ListParams>,
    Query(filter): Query<ProductFilterParams>,
) -> ApiResult<Json<ListResponse<ProductResponse>>> {
    let page = state
        .product_service
        .list(&user, &params.into_query(), filter.category_id()?)
        .await?;

    Ok(Json(ListResponse::from_page(page)))
}

pub async fn create_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<ProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let product = state
        .product_service
        .create(&user, ProductInput::try_from(payload)?)
        .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

pub async fn get_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(product_id): Path<Uuid>,
) -> ApiResult<Json<ProductResponse>> {
    let product = state
        .product_service
        .get(&user, ProductId::from_uuid(product_id))
        .await?;

    Ok(Json(ProductResponse::from(product)))
}

pub async fn update_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<ProductRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let product = state
        .product_service
        .update(
            &user,
            ProductId::from_uuid(product_id),
            ProductInput::try_from(payload)?,
        )
        .await?;

    Ok(Json(ProductResponse::from(product)))
}

pub async fn delete_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(product_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .product_service
        .delete(&user, ProductId::from_uuid(product_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(product_id): Path<Uuid>,
) -> ApiResult<Json<ProductResponse>> {
    let product = state
        .product_service
        .restore(&user, ProductId::from_uuid(product_id))
        .await?;

    Ok(Json(ProductResponse::from(product)))
}

pub async fn export_products_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<ListParams>,
    Query(filter): Query<ProductFilterParams>,
) -> ApiResult<Response> {
    let document = state
        .product_service
        .export_products(&user, &params.into_query(), filter.category_id()?)
        .await?;

    let file_name = timestamped_file_name(PRODUCT_EXPORT_FILE_PREFIX, Local::now().naive_local());
    Ok(csv_attachment(&file_name, document.to_bytes()?)?)
}
