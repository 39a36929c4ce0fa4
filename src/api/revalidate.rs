//! Shared-secret cache refresh hook
//!
//! Called by the CMS (or an operator) after publishing, so edits show up
//! before the TTL expires. The whole response cache is purged; the next
//! render refetches.

use crate::api::error_response::ApiError;
use crate::api::AppState;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct RevalidateQuery {
    pub secret: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RevalidateResponse {
    pub revalidated: bool,
    pub message: String,
}

pub async fn revalidate(
    State(state): State<AppState>,
    Query(query): Query<RevalidateQuery>,
) -> Response {
    let configured = &state.settings.revalidate.secret;

    // An empty configured secret disables the endpoint entirely
    if configured.is_empty() || query.secret.as_deref() != Some(configured.as_str()) {
        return ApiError::InvalidToken.into_response();
    }

    let path = query.path.unwrap_or_else(|| "/".to_string());
    state.service.purge();
    info!(%path, "content cache purged for revalidation");

    Json(RevalidateResponse {
        revalidated: true,
        message: format!("Path {path} revalidated successfully"),
    })
    .into_response()
}
