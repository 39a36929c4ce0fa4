//! Authenticated pass-through proxy for origin media assets
//!
//! The origin sits behind basic auth, so browsers cannot load its images
//! directly; rewritten URLs route here instead. Strict input policy: only
//! assets on the configured origin are fetched, everything else is rejected
//! rather than forwarded. Failures after a valid origin URL redirect to the
//! placeholder so an `<img>` slot always has something to render.

use crate::api::error_response::ApiError;
use crate::api::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{error, warn};
use url::Url;

const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

pub async fn image_proxy(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Response {
    let rewriter = state.service.rewriter();

    let Some(raw_url) = query.url.filter(|url| !url.is_empty()) else {
        return ApiError::MissingParam("url").into_response();
    };

    // A proxied URL arriving here means something fed our own output back in
    if raw_url.contains(rewriter.proxy_path()) {
        warn!(url = %raw_url, "rejecting recursive proxy request");
        return ApiError::ProxyLoop.into_response();
    }

    let target = if raw_url.starts_with('/') && !raw_url.starts_with("//") {
        format!("{}{}", rewriter.origin_base(), raw_url)
    } else {
        raw_url.clone()
    };

    let parsed = match Url::parse(&target) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(url = %raw_url, error = %err, "rejecting unparseable asset URL");
            return ApiError::InvalidAssetUrl(raw_url).into_response();
        }
    };

    if parsed.host_str() != Some(rewriter.origin_host()) {
        warn!(host = ?parsed.host_str(), "rejecting non-origin asset request");
        return ApiError::ForeignHost(parsed.host_str().unwrap_or_default().to_string())
            .into_response();
    }

    let upstream = &state.settings.upstream;
    let mut request = state.service.http().get(parsed.as_str());
    if !upstream.username.is_empty() {
        request = request.basic_auth(&upstream.username, Some(&upstream.password));
    }

    match request.send().await {
        Ok(response) if response.status().is_success() => {
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string();

            match response.bytes().await {
                Ok(body) => asset_response(body, &content_type, state.settings.assets.max_age_secs),
                Err(err) => {
                    error!(url = %parsed, error = %err, "failed to read asset body");
                    Redirect::temporary(&rewriter.placeholder("Proxy error")).into_response()
                }
            }
        }
        Ok(response) => {
            warn!(url = %parsed, status = %response.status(), "upstream asset fetch failed");
            Redirect::temporary(&rewriter.placeholder("Image not found")).into_response()
        }
        Err(err) => {
            error!(url = %parsed, error = %err, "upstream asset fetch errored");
            Redirect::temporary(&rewriter.placeholder("Proxy error")).into_response()
        }
    }
}

fn asset_response(body: Bytes, content_type: &str, max_age_secs: u64) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CACHE_CONTROL,
                format!("public, max-age={max_age_secs}"),
            ),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
        ],
        body,
    )
        .into_response()
}
