use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use masterhub_core::{TenantId, UserIdentity};
use masterhub_domain::TenantInput;
use uuid::Uuid;

use crate::dto::{ListParams, ListResponse, TenantRequest, TenantResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_tenants_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<ListResponse<TenantResponse>>> {
    let page = state
        .tenant_service
        .list(&user, &params.into_query())
        .await?;

    Ok(Json(ListResponse::from_page(page)))
}

pub async fn create_tenant_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<TenantRequest>,
) -> ApiResult<(StatusCode, Json<TenantResponse>)> {
    let tenant = state
        .tenant_service
        .create(&user, TenantInput::from(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(TenantResponse::from(tenant))))
}

pub async fn get_tenant_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<TenantResponse>> {
    let tenant = state
        .tenant_service
        .get(&user, TenantId::from_uuid(tenant_id))
        .await?;

    Ok(Json(TenantResponse::from(tenant)))
}

pub async fn update_tenant_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<TenantRequest>,
) -> ApiResult<Json<TenantResponse>> {
    let tenant = state
        .tenant_service
        .update(&user, TenantId::from_uuid(tenant_id), TenantInput::from(payload))
        .await?;

    Ok(Json(TenantResponse::from(tenant)))
}

pub async fn delete_tenant_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .tenant_service
        .delete(&user, TenantId::from_uuid(tenant_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore_tenant_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<TenantResponse>> {
    let tenant = state
        .tenant_service
        .restore(&user, TenantId::from_uuid(tenant_id))
        .await?;

    Ok(Json(TenantResponse::from(tenant)))
}
