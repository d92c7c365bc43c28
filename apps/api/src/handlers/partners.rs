use axum::Json;
use axum::extract::{Extension, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Local;
use masterhub_application::PARTNER_EXPORT_FILE_PREFIX;
use masterhub_application::csv_import::{ImportResult, timestamped_file_name};
use masterhub_core::{AppError, UserIdentity};
use masterhub_domain::{PartnerId, PartnerInput};
use uuid::Uuid;

use crate::dto::{
    ImportCountResponse, ImportParams, ListParams, ListResponse, PartnerRequest, PartnerResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::csv_download::csv_attachment;

const IMPORT_FILE_FIELD: &str = "file";

pub async fn list_partners_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<ListResponse<PartnerResponse>>> {
    let page = state
        .partner_service
        .list(&user, &params.into_query())
        .await?;

    Ok(Json(ListResponse::from_page(page)))
}

pub async fn create_partner_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<PartnerRequest>,
) -> ApiResult<(StatusCode, Json<PartnerResponse>)> {
    let partner = state
        .partner_service
        .create(&user, PartnerInput::try_from(payload)?)
        .await?;

    Ok((StatusCode::CREATED, Json(PartnerResponse::from(partner))))
}

pub async fn get_partner_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(partner_id): Path<Uuid>,
) -> ApiResult<Json<PartnerResponse>> {
    let partner = state
        .partner_service
        .get(&user, PartnerId::from_uuid(partner_id))
        .await?;

    Ok(Json(PartnerResponse::from(partner)))
}

pub async fn update_partner_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(partner_id): Path<Uuid>,
    Json(payload): Json<PartnerRequest>,
) -> ApiResult<Json<PartnerResponse>> {
    let partner = state
        .partner_service
        .update(
            &user,
            PartnerId::from_uuid(partner_id),
            PartnerInput::try_from(payload)?,
        )
        .await?;

    Ok(Json(PartnerResponse::from(partner)))
}

pub async fn delete_partner_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(partner_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .partner_service
        .delete(&user, PartnerId::from_uuid(partner_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore_partner_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(partner_id): Path<Uuid>,
) -> ApiResult<Json<PartnerResponse>> {
    let partner = state
        .partner_service
        .restore(&user, PartnerId::from_uuid(partner_id))
        .await?;

    Ok(Json(PartnerResponse::from(partner)))
}

/// Imports an uploaded CSV file. A rejected file is answered with the error report.
pub async fn import_partners_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<ImportParams>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let delimiter = params.delimiter_or(state.csv_import_delimiter)?;
    let bytes = read_upload(multipart).await?;

    match state
        .partner_service
        .import_partners(&user, &bytes, delimiter)
        .await?
    {
        ImportResult::Success { created } => {
            Ok(Json(ImportCountResponse { count: created }).into_response())
        }
        ImportResult::Failure(report) => {
            let file_name = report.file_name(Local::now().naive_local());
            Ok(csv_attachment(&file_name, report.to_csv_bytes()?)?)
        }
    }
}

pub async fn export_partners_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<ListParams>,
) -> ApiResult<Response> {
    let document = state
        .partner_service
        .export_partners(&user, &params.into_query())
        .await?;

    let file_name = timestamped_file_name(PARTNER_EXPORT_FILE_PREFIX, Local::now().naive_local());
    Ok(csv_attachment(&file_name, document.to_bytes()?)?)
}

async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| AppError::Validation(format!("invalid upload: {}", error.body_text())))?
    {
        if field.name() != Some(IMPORT_FILE_FIELD) {
            continue;
        }

        let bytes = field.bytes().await.map_err(|error| {
            AppError::Validation(format!("failed to read uploaded file: {}", error.body_text()))
        })?;
        return Ok(bytes.to_vec());
    }

    Err(AppError::Validation(format!(
        "{IMPORT_FILE_FIELD}: no file was submitted"
    )))
}
