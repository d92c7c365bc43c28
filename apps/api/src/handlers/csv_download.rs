use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use masterhub_core::AppError;

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Builds an attachment response carrying an already encoded CSV body.
pub(super) fn csv_attachment(file_name: &str, body: Vec<u8>) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .map_err(|error| {
            AppError::Internal(format!("invalid download file name '{file_name}': {error}"))
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(CSV_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
