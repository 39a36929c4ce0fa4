//! Remote-content access layer
//!
//! Everything between the upstream CMS and the page layer lives here:
//! - `rewriter`: classifies origin asset URLs and rewrites them through the
//!   local proxy endpoint
//! - `transform`: applies the rewriter to HTML fragments and free-form
//!   field trees
//! - `cache` / `client`: TTL-cached upstream fetches with stale fallback
//! - `service`: typed accessors, one pair per content kind
//! - `types` / `text`: entity definitions and text helpers

pub mod cache;
pub mod client;
pub mod rewriter;
pub mod service;
pub mod text;
pub mod transform;
pub mod types;

pub use cache::{CachedPayload, ResponseCache};
pub use client::{CachePolicy, CachedClient, ContentError, FetchOptions};
pub use rewriter::AssetRewriter;
pub use service::{ContentService, Page, PostFilters};
pub use transform::ContentTransformer;
