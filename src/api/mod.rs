//! HTTP surface of the content gateway
//!
//! Routes:
//! - asset proxy (`assets.proxy_path`, default `/api/image-proxy`)
//! - JSON content routes consumed by the site's pages
//! - revalidation hook, HEAD diagnostics, health

pub mod asset_proxy;
pub mod content_routes;
pub mod debug;
pub mod error_response;
pub mod revalidate;

#[cfg(test)]
mod integration_tests;

use crate::config::Settings;
use crate::content::ContentService;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Well-known route paths
pub mod paths {
    pub const HEALTH: &str = "/health";
    pub const BLOG: &str = "/api/blog";
    pub const COURSES: &str = "/api/courses";
    pub const TRAINERS: &str = "/api/trainers";
    pub const GALLERY: &str = "/api/gallery";
    pub const REVALIDATE: &str = "/api/revalidate";
    pub const DEBUG_IMAGE: &str = "/api/debug-image";
}

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub service: Arc<ContentService>,
}

pub fn router(settings: Arc<Settings>, service: Arc<ContentService>) -> Router {
    let proxy_path = settings.assets.proxy_path.clone();
    let state = AppState { settings, service };

    Router::new()
        .route(paths::HEALTH, get(health_handler))
        .route(paths::BLOG, get(content_routes::blog))
        .route(paths::COURSES, get(content_routes::courses))
        .route(paths::TRAINERS, get(content_routes::trainers))
        .route(paths::GALLERY, get(content_routes::gallery))
        .route(paths::REVALIDATE, get(revalidate::revalidate))
        .route(paths::DEBUG_IMAGE, get(debug::debug_image))
        .route(&proxy_path, get(asset_proxy::image_proxy))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Health check handler
async fn health_handler() -> &'static str {
    "OK"
}
