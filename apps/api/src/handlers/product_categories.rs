use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use masterhub_core::UserIdentity;
use masterhub_domain::{ProductCategoryId, ProductCategoryInput};
use uuid::Uuid;

use crate::dto::{
    ListParams, ListResponse, ProductCategoryChoiceResponse, ProductCategoryRequest,
    ProductCategoryResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_product_categories_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<ListResponse<ProductCategoryResponse>>> {
    let page = state
        .product_category_service
        .list(&user, &params.into_query())
        .await?;

    Ok(Json(ListResponse::from_page(page)))
}

pub async fn product_category_choices_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<ProductCategoryChoiceResponse>>> {
    let choices = state
        .product_category_service
        .choices(&user)
        .await?
        .into_iter()
        .map(ProductCategoryChoiceResponse::from)
        .collect();

    Ok(Json(choices))
}

pub async fn create_product_category_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<ProductCategoryRequest>,
) -> ApiResult<(StatusCode, Json<ProductCategoryResponse>)> {
    let category = state
        .product_category_service
        .create(&user, ProductCategoryInput::from(payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductCategoryResponse::from(category)),
    ))
}

pub async fn get_product_category_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(category_id): Path<Uuid>,
) -> ApiResult<Json<ProductCategoryResponse>> {
    let category = state
        .product_category_service
        .get(&user, ProductCategoryId::from_uuid(category_id))
        .await?;

    Ok(Json(ProductCategoryResponse::from(category)))
}

pub async fn update_product_category_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<ProductCategoryRequest>,
) -> ApiResult<Json<ProductCategoryResponse>> {
    let category = state
        .product_category_service
        .update(
            &user,
            ProductCategoryId::from_uuid(category_id),
            ProductCategoryInput::from(payload),
        )
        .await?;

    Ok(Json(ProductCategoryResponse::from(category)))
}

pub async fn delete_product_category_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(category_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .product_category_service
        .delete(&user, ProductCategoryId::from_uuid(category_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore_product_category_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(category_id): Path<Uuid>,
) -> ApiResult<Json<ProductCategoryResponse>> {
    let category = state
        .product_category_service
        .restore(&user, ProductCategoryId::from_uuid(category_id))
        .await?;

    Ok(Json(ProductCategoryResponse::from(category)))
}
