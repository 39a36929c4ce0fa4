//! JSON content routes consumed by the site's pages
//!
//! Thin wrappers over the [`crate::content::ContentService`] accessors;
//! degradation behavior (empty lists, empty pages) lives in the service
//! layer so these handlers never fail. Wire shapes match what the pages
//! already consume: the blog route returns a paged object, the others
//! return bare arrays.

use crate::api::AppState;
use crate::content::service::PostFilters;
use crate::content::types::{Course, GalleryImage, Post, Trainer};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct BlogQuery {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub posts: Vec<Post>,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

pub async fn blog(
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
) -> Json<BlogResponse> {
    let filters = PostFilters {
        categories: query.category,
        tags: query.tag,
        search: query.search,
    };
    let page = state
        .service
        .get_all_posts(query.limit.unwrap_or(10), query.page.unwrap_or(1), &filters)
        .await;
    Json(BlogResponse {
        posts: page.items,
        total: page.total,
        total_pages: page.total_pages,
    })
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub category: Option<String>,
}

pub async fn courses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Course>> {
    let page = state
        .service
        .get_all_courses(
            query.limit.unwrap_or(100),
            query.page.unwrap_or(1),
            query.category.as_deref(),
        )
        .await;
    Json(page.items)
}

pub async fn trainers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Trainer>> {
    let page = state
        .service
        .get_all_trainers(query.limit.unwrap_or(100), query.page.unwrap_or(1))
        .await;
    Json(page.items)
}

pub async fn gallery(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<GalleryImage>> {
    let page = state
        .service
        .get_all_gallery_images(
            query.limit.unwrap_or(12),
            query.page.unwrap_or(1),
            query.category.as_deref(),
        )
        .await;
    Json(page.items)
}
