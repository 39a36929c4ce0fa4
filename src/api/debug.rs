//! HEAD diagnostics for asset URLs
//!
//! Returns the upstream status and headers for a given URL as JSON, handy
//! when chasing broken images without shell access to the origin.

use crate::api::error_response::{ApiError, ErrorResponse};
use crate::api::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct DebugQuery {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DebugReport {
    pub url: String,
    pub status: u16,
    pub ok: bool,
    pub headers: BTreeMap<String, String>,
}

pub async fn debug_image(
    State(state): State<AppState>,
    Query(query): Query<DebugQuery>,
) -> Response {
    let Some(url) = query.url.filter(|url| !url.is_empty()) else {
        return ApiError::MissingParam("url").into_response();
    };

    match state.service.http().head(&url).send().await {
        Ok(response) => {
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|text| (name.to_string(), text.to_string()))
                })
                .collect();

            Json(DebugReport {
                url,
                status: response.status().as_u16(),
                ok: response.status().is_success(),
                headers,
            })
            .into_response()
        }
        Err(err) => ErrorResponse::new("UPSTREAM_ERROR", format!("HEAD request failed: {err}"))
            .with_details(serde_json::json!({ "url": url }))
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
