//! Typed accessors over the upstream content API
//!
//! One accessor pair per content kind. Every accessor is infallible at the
//! boundary: upstream failures degrade to an empty list or `None` so the
//! page layer always receives something renderable. Raw responses are run
//! through the content transformer *before* decoding, so any URL that
//! reaches a caller has already been rewritten through the proxy.

use crate::config::Settings;
use crate::content::cache::CachedPayload;
use crate::content::client::{CachedClient, ContentError, FetchOptions};
use crate::content::rewriter::AssetRewriter;
use crate::content::transform::ContentTransformer;
use crate::content::types::{Category, Course, GalleryImage, Post, Trainer, TrainerRef};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

const DEFAULT_AUTHOR: &str = "Unknown author";

/// Optional filters for post queries
#[derive(Clone, Debug, Default)]
pub struct PostFilters {
    pub categories: Option<String>,
    pub tags: Option<String>,
    pub search: Option<String>,
}

/// One page of items plus upstream pagination metadata
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            total_pages: 0,
        }
    }
}

impl<T> Page<T> {
    /// Totals come from the upstream pagination headers when present and
    /// fall back to the fetched page's length
    fn from_payload(items: Vec<T>, payload: &CachedPayload, per_page: u32) -> Self {
        let total = payload.total.unwrap_or(items.len() as u64);
        let total_pages = payload.total_pages.unwrap_or_else(|| {
            if per_page == 0 {
                0
            } else {
                total.div_ceil(per_page as u64)
            }
        });
        Self {
            items,
            total,
            total_pages,
        }
    }
}

pub struct ContentService {
    api_base: String,
    client: CachedClient,
    transformer: ContentTransformer,
}

impl ContentService {
    pub fn new(settings: &Settings) -> Result<Self, ContentError> {
        let origin = settings.upstream.origin()?;
        let rewriter = AssetRewriter::new(
            &origin,
            &settings.assets.proxy_path,
            &settings.assets.placeholder_path,
        );
        let client = CachedClient::new(&settings.upstream, settings.cache.ttl())?;

        Ok(Self {
            api_base: settings.upstream.api_base(),
            client,
            transformer: ContentTransformer::new(rewriter),
        })
    }

    pub fn rewriter(&self) -> &AssetRewriter {
        self.transformer.rewriter()
    }

    /// Shared outbound connection pool (asset proxy, diagnostics)
    pub fn http(&self) -> reqwest::Client {
        self.client.http()
    }

    /// Drop every cached response; the next render refetches. Used by the
    /// revalidation hook.
    pub fn purge(&self) {
        self.client.cache().purge();
    }

    pub async fn get_all_posts(
        &self,
        per_page: u32,
        page: u32,
        filters: &PostFilters,
    ) -> Page<Post> {
        let mut url = format!(
            "{}/posts?per_page={per_page}&page={page}&_embed",
            self.api_base
        );
        let mut key = format!("posts_{per_page}_{page}");

        if let Some(categories) = &filters.categories {
            url.push_str(&format!("&categories={categories}"));
            key.push_str(&format!("_c{categories}"));
        }
        if let Some(tags) = &filters.tags {
            url.push_str(&format!("&tags={tags}"));
            key.push_str(&format!("_t{tags}"));
        }
        if let Some(search) = &filters.search {
            url.push_str(&format!("&search={}", urlencoding::encode(search)));
            key.push_str(&format!("_s{search}"));
        }

        let payload = match self.client.get(&url, FetchOptions::keyed(key)).await {
            Ok(payload) => payload,
            Err(err) => {
                error!(error = %err, "failed to fetch posts");
                return Page::default();
            }
        };

        let posts: Vec<Post> = self
            .decode_list(&payload.body)
            .into_iter()
            .map(Self::decorate_post)
            .collect();

        Page::from_payload(posts, &payload, per_page)
    }

    pub async fn get_post_by_slug(&self, slug: &str) -> Option<Post> {
        let url = format!(
            "{}/posts?slug={}&_embed",
            self.api_base,
            urlencoding::encode(slug)
        );
        let key = format!("post_{slug}");

        let payload = match self.client.get(&url, FetchOptions::keyed(key)).await {
            Ok(payload) => payload,
            Err(err) => {
                error!(slug, error = %err, "failed to fetch post by slug");
                return None;
            }
        };

        self.single_from_list(&payload.body, slug)
            .map(Self::decorate_post)
    }

    pub async fn get_all_courses(
        &self,
        per_page: u32,
        page: u32,
        category: Option<&str>,
    ) -> Page<Course> {
        let mut url = format!(
            "{}/courses?per_page={per_page}&page={page}&_embed",
            self.api_base
        );
        let mut key = format!("courses_{per_page}_{page}");
        if let Some(category) = category {
            url.push_str(&format!("&category={category}"));
            key.push_str(&format!("_c{category}"));
        }

        let payload = match self.client.get(&url, FetchOptions::keyed(key)).await {
            Ok(payload) => payload,
            Err(err) => {
                error!(error = %err, "failed to fetch courses");
                return Page::default();
            }
        };

        let courses: Vec<Course> = self.decode_list(&payload.body);
        let mut resolved = Vec::with_capacity(courses.len());
        for course in courses {
            resolved.push(self.resolve_trainer(Self::decorate_course(course)).await);
        }
        Page::from_payload(resolved, &payload, per_page)
    }

    pub async fn get_course_by_slug(&self, slug: &str) -> Option<Course> {
        let url = format!(
            "{}/courses?slug={}&_embed",
            self.api_base,
            urlencoding::encode(slug)
        );
        let key = format!("course_{slug}");

        let payload = match self.client.get(&url, FetchOptions::keyed(key)).await {
            Ok(payload) => payload,
            Err(err) => {
                error!(slug, error = %err, "failed to fetch course by slug");
                return None;
            }
        };

        let course = self.single_from_list(&payload.body, slug)?;
        Some(self.resolve_trainer(Self::decorate_course(course)).await)
    }

    pub async fn get_all_trainers(&self, per_page: u32, page: u32) -> Page<Trainer> {
        let url = format!(
            "{}/trainers?per_page={per_page}&page={page}&_embed",
            self.api_base
        );
        let key = format!("trainers_{per_page}_{page}");

        let payload = match self.client.get(&url, FetchOptions::keyed(key)).await {
            Ok(payload) => payload,
            Err(err) => {
                error!(error = %err, "failed to fetch trainers");
                return Page::default();
            }
        };

        let trainers = self
            .decode_list(&payload.body)
            .into_iter()
            .map(Self::decorate_trainer)
            .collect();
        Page::from_payload(trainers, &payload, per_page)
    }

    pub async fn get_trainer_by_slug(&self, slug: &str) -> Option<Trainer> {
        let url = format!(
            "{}/trainers?slug={}&_embed",
            self.api_base,
            urlencoding::encode(slug)
        );
        let key = format!("trainer_slug_{slug}");

        let payload = match self.client.get(&url, FetchOptions::keyed(key)).await {
            Ok(payload) => payload,
            Err(err) => {
                error!(slug, error = %err, "failed to fetch trainer by slug");
                return None;
            }
        };

        self.single_from_list(&payload.body, slug)
            .map(Self::decorate_trainer)
    }

    /// Lookup by post id; single-object response, shares the cache with the
    /// other accessors so course decoration benefits from stale fallback too
    pub async fn get_trainer_by_id(&self, id: u64) -> Option<Trainer> {
        let url = format!("{}/trainers/{id}?_embed", self.api_base);
        let key = format!("trainer_{id}");

        let payload = match self.client.get(&url, FetchOptions::keyed(key)).await {
            Ok(payload) => payload,
            Err(err) => {
                error!(trainer = id, error = %err, "failed to fetch trainer by id");
                return None;
            }
        };

        let trainer = self.decode_item(&payload.body)?;
        Some(Self::decorate_trainer(trainer))
    }

    pub async fn get_all_gallery_images(
        &self,
        per_page: u32,
        page: u32,
        category: Option<&str>,
    ) -> Page<GalleryImage> {
        let mut url = format!(
            "{}/gallery?per_page={per_page}&page={page}&_embed",
            self.api_base
        );
        let mut key = format!("gallery_{per_page}_{page}");
        if let Some(category) = category {
            url.push_str(&format!("&category={category}"));
            key.push_str(&format!("_c{category}"));
        }

        let payload = match self.client.get(&url, FetchOptions::keyed(key)).await {
            Ok(payload) => payload,
            Err(err) => {
                error!(error = %err, "failed to fetch gallery images");
                return Page::default();
            }
        };

        let images = self
            .decode_list(&payload.body)
            .into_iter()
            .map(Self::decorate_gallery_image)
            .collect();
        Page::from_payload(images, &payload, per_page)
    }

    pub async fn get_gallery_image_by_slug(&self, slug: &str) -> Option<GalleryImage> {
        let url = format!(
            "{}/gallery?slug={}&_embed",
            self.api_base,
            urlencoding::encode(slug)
        );
        let key = format!("gallery_slug_{slug}");

        let payload = match self.client.get(&url, FetchOptions::keyed(key)).await {
            Ok(payload) => payload,
            Err(err) => {
                error!(slug, error = %err, "failed to fetch gallery image by slug");
                return None;
            }
        };

        self.single_from_list(&payload.body, slug)
            .map(Self::decorate_gallery_image)
    }

    pub async fn get_categories(&self) -> Vec<Category> {
        let url = format!("{}/categories?per_page=100", self.api_base);

        let payload = match self.client.get(&url, FetchOptions::keyed("categories")).await {
            Ok(payload) => payload,
            Err(err) => {
                error!(error = %err, "failed to fetch categories");
                return Vec::new();
            }
        };

        self.decode_list(&payload.body)
    }

    // ---- decoding and decoration ----

    /// Transform then decode a raw item; a malformed record is dropped with
    /// a warning instead of failing the whole response
    fn decode_item<T: DeserializeOwned>(&self, raw: &Value) -> Option<T> {
        let transformed = self.transformer.transform_value(raw);
        match serde_json::from_value(transformed) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!(error = %err, "skipping malformed content item");
                None
            }
        }
    }

    fn decode_list<T: DeserializeOwned>(&self, body: &Value) -> Vec<T> {
        let Some(items) = body.as_array() else {
            warn!("expected a list response from the upstream API");
            return Vec::new();
        };
        items.iter().filter_map(|raw| self.decode_item(raw)).collect()
    }

    /// 0 or 1 items expected; more than one means duplicate slugs upstream
    fn single_from_list<T: DeserializeOwned>(&self, body: &Value, slug: &str) -> Option<T> {
        let items = body.as_array()?;
        if items.len() > 1 {
            warn!(slug, matches = items.len(), "multiple items share a slug, using the first");
        }
        self.decode_item(items.first()?)
    }

    fn decorate_post(mut post: Post) -> Post {
        let author_name = post
            .embedded
            .as_ref()
            .and_then(|embedded| embedded.author_name())
            .unwrap_or(DEFAULT_AUTHOR)
            .to_string();
        let featured_image_url = post
            .embedded
            .as_ref()
            .and_then(|embedded| embedded.featured_image_url())
            .map(str::to_string);
        let category_names = post
            .embedded
            .as_ref()
            .map(|embedded| embedded.category_names())
            .unwrap_or_default();

        post.author_name = Some(author_name);
        post.featured_image_url = featured_image_url;
        post.category_names = Some(category_names);
        post
    }

    fn decorate_course(mut course: Course) -> Course {
        course.featured_image_url = course
            .embedded
            .as_ref()
            .and_then(|embedded| embedded.featured_image_url())
            .map(str::to_string);
        course
    }

    fn decorate_trainer(mut trainer: Trainer) -> Trainer {
        trainer.featured_image_url = trainer
            .embedded
            .as_ref()
            .and_then(|embedded| embedded.featured_image_url())
            .map(str::to_string);
        trainer
    }

    fn decorate_gallery_image(mut image: GalleryImage) -> GalleryImage {
        image.featured_image_url = image
            .embedded
            .as_ref()
            .and_then(|embedded| embedded.featured_image_url())
            .map(str::to_string);
        image
    }

    /// Attach the fully decorated trainer referenced by the course's field
    /// bag. Failure to resolve leaves the course intact without
    /// `trainer_data`.
    async fn resolve_trainer(&self, mut course: Course) -> Course {
        let Some(reference) = TrainerRef::from_acf(&course.acf) else {
            return course;
        };

        match self.get_trainer_by_id(reference.id()).await {
            Some(trainer) => course.trainer_data = Some(trainer),
            None => {
                warn!(
                    course = course.id,
                    trainer = reference.id(),
                    "course trainer could not be resolved"
                );
            }
        }
        course
    }
}
