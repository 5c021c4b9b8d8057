//! Authentication middleware
//!
//! Bearer API key check for the dispatch and management endpoints.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::server::AppState;

/// API key authentication middleware
///
/// The expected key comes from `server.api_key` (`API_KEY`). With no key
/// configured every request passes.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let expected = state
        .config
        .server
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty());

    if validate_api_key(provided, expected) {
        Ok(next.run(request).await)
    } else {
        warn!("Rejected request to {}: bad or missing API key", request.uri().path());
        Err(StatusCode::UNAUTHORIZED)
    }
}

/// Simple API key validation
pub fn validate_api_key(provided: Option<&str>, expected: Option<&str>) -> bool {
    match (provided, expected) {
        (Some(p), Some(e)) => p == e,
        (_, None) => true,
        (None, Some(_)) => false,
    }
}
