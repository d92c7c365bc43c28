use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, Uri, header};
use axum::middleware::Next;
use axum::response::Response;
use masterhub_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::auth::SESSION_USER_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the session identity into a request extension.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Blocks state-changing requests that do not come from the frontend origin.
pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        check_request_origin(request.headers(), &state.frontend_url)?;
    }

    Ok(next.run(request).await)
}

fn check_request_origin(headers: &HeaderMap, allowed_origin: &str) -> Result<(), AppError> {
    if headers.get("sec-fetch-site") == Some(&HeaderValue::from_static("cross-site")) {
        return Err(AppError::Unauthorized("cross-site request blocked".to_owned()));
    }

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let allowed_origin = allowed_origin.trim_end_matches('/');
    if origin == allowed_origin || referer_origin(referer).as_deref() == Some(allowed_origin) {
        return Ok(());
    }

    Err(AppError::Unauthorized("origin validation failed".to_owned()))
}

/// Returns the `scheme://host[:port]` part of a Referer value.
fn referer_origin(referer: &str) -> Option<String> {
    let uri = referer.parse::<Uri>().ok()?;
    let scheme = uri.scheme_str()?;
    let authority = uri.authority()?;
    if authority.as_str().contains('@') {
        return None;
    }

    Some(format!("{scheme}://{authority}"))
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
