//! Entity definitions for the upstream content kinds
//!
//! Fields keep the upstream wire names (`featured_media`, `_embedded`,
//! `wp:featuredmedia`, ...) via serde renames. Unknown upstream fields are
//! preserved through `#[serde(flatten)]` maps so nothing is dropped between
//! fetch and page layer. Decorated fields (`author_name`,
//! `featured_image_url`, `category_names`, `trainer_data`) are attached by
//! the content service and absent on the wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An HTML fragment as rendered by the upstream CMS; treated as opaque text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub rendered: String,
}

/// Featured-media record under `_embedded["wp:featuredmedia"]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddedMedia {
    #[serde(default)]
    pub source_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddedAuthor {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddedTerm {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Linked records delivered alongside an entity when `_embed` is requested
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embedded {
    #[serde(rename = "wp:featuredmedia", default, skip_serializing_if = "Option::is_none")]
    pub featured_media: Option<Vec<EmbeddedMedia>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Vec<EmbeddedAuthor>>,
    #[serde(rename = "wp:term", default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<Vec<Vec<EmbeddedTerm>>>,
}

impl Embedded {
    pub fn featured_image_url(&self) -> Option<&str> {
        self.featured_media
            .as_ref()?
            .first()
            .map(|media| media.source_url.as_str())
            .filter(|source_url| !source_url.is_empty())
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()?
            .first()
            .map(|author| author.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Names from the first term taxonomy (categories)
    pub fn category_names(&self) -> Vec<String> {
        self.terms
            .as_ref()
            .and_then(|taxonomies| taxonomies.first())
            .map(|terms| terms.iter().map(|term| term.name.clone()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: RichText,
    #[serde(default)]
    pub content: RichText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<RichText>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub modified: String,
    #[serde(default)]
    pub author: u64,
    #[serde(default)]
    pub categories: Vec<u64>,
    #[serde(default)]
    pub featured_media: u64,
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    // Decorated fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: RichText,
    #[serde(default)]
    pub content: RichText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<RichText>,
    #[serde(default)]
    pub featured_media: u64,
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
    /// Free-form field bag: level, duration, participant cap, benefit and
    /// requirement text blocks, trainer reference
    #[serde(default)]
    pub acf: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    // Decorated fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer_data: Option<Trainer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trainer {
    pub id: u64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: RichText,
    #[serde(default)]
    pub content: RichText,
    #[serde(default)]
    pub featured_media: u64,
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
    /// Role, specialty/certification text blocks, per-weekday schedule
    /// strings, social URLs
    #[serde(default)]
    pub acf: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    // Decorated fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image_url: Option<String>,
}

/// One weekday entry of a trainer's schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSlot {
    pub day: &'static str,
    pub time: String,
}

/// A trainer's social-media link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialLink {
    pub platform: &'static str,
    pub url: String,
}

const WEEKDAYS: &[(&str, &str)] = &[
    ("schedule_monday", "Monday"),
    ("schedule_tuesday", "Tuesday"),
    ("schedule_wednesday", "Wednesday"),
    ("schedule_thursday", "Thursday"),
    ("schedule_friday", "Friday"),
    ("schedule_saturday", "Saturday"),
    ("schedule_sunday", "Sunday"),
];

const SOCIAL_PLATFORMS: &[(&str, &str)] = &[
    ("instagram_url", "instagram"),
    ("facebook_url", "facebook"),
];

impl Trainer {
    fn acf_str(&self, key: &str) -> Option<&str> {
        self.acf.get(key)?.as_str().filter(|value| !value.is_empty())
    }

    pub fn role(&self) -> Option<&str> {
        self.acf_str("role")
    }

    /// Weekday slots with a configured time, in week order
    pub fn weekly_schedule(&self) -> Vec<ScheduleSlot> {
        WEEKDAYS
            .iter()
            .filter_map(|(key, day)| {
                self.acf_str(key).map(|time| ScheduleSlot {
                    day,
                    time: time.to_string(),
                })
            })
            .collect()
    }

    pub fn social_links(&self) -> Vec<SocialLink> {
        SOCIAL_PLATFORMS
            .iter()
            .filter_map(|(key, platform)| {
                self.acf_str(key).map(|url| SocialLink {
                    platform,
                    url: url.to_string(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: u64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: RichText,
    #[serde(default)]
    pub content: RichText,
    #[serde(default)]
    pub featured_media: u64,
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
    #[serde(default)]
    pub acf: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    // Decorated fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image_url: Option<String>,
}

impl GalleryImage {
    pub fn category(&self) -> Option<&str> {
        self.acf.get("category")?.as_str()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub count: u64,
}

/// A course's trainer reference as delivered by the field bag: either a
/// bare post id or an embedded object carrying one. Resolved once during
/// decoration instead of shape-checked at every use site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrainerRef {
    Id(u64),
    Object(TrainerRefObject),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerRefObject {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "post_title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "post_name", default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl TrainerRef {
    pub fn id(&self) -> u64 {
        match self {
            TrainerRef::Id(id) => *id,
            TrainerRef::Object(object) => object.id,
        }
    }

    /// Pull the trainer reference out of a course's field bag, tolerating
    /// every shape the upstream emits (missing, `false`, id, object)
    pub fn from_acf(acf: &Value) -> Option<TrainerRef> {
        let raw = acf.get("trainer")?;
        if raw.is_null() {
            return None;
        }
        serde_json::from_value(raw.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trainer_ref_from_bare_id() {
        let acf = json!({ "trainer": 7 });
        assert_eq!(TrainerRef::from_acf(&acf).unwrap().id(), 7);
    }

    #[test]
    fn test_trainer_ref_from_embedded_object() {
        let acf = json!({ "trainer": { "ID": 7, "post_title": "Marco", "post_name": "marco" } });
        let reference = TrainerRef::from_acf(&acf).unwrap();
        assert_eq!(reference.id(), 7);
    }

    #[test]
    fn test_trainer_ref_shapes_resolve_to_same_id() {
        let bare = TrainerRef::from_acf(&json!({ "trainer": 7 })).unwrap();
        let embedded = TrainerRef::from_acf(&json!({ "trainer": { "ID": 7 } })).unwrap();
        assert_eq!(bare.id(), embedded.id());
    }

    #[test]
    fn test_trainer_ref_tolerates_junk() {
        assert!(TrainerRef::from_acf(&json!({})).is_none());
        assert!(TrainerRef::from_acf(&json!({ "trainer": null })).is_none());
        assert!(TrainerRef::from_acf(&json!({ "trainer": false })).is_none());
        assert!(TrainerRef::from_acf(&json!({ "trainer": "coach" })).is_none());
    }

    #[test]
    fn test_post_decodes_from_wire_shape() {
        let raw = json!({
            "id": 12,
            "slug": "open-day",
            "title": { "rendered": "Open day" },
            "content": { "rendered": "<p>Come visit</p>" },
            "date": "2024-05-01T10:00:00",
            "author": 3,
            "categories": [5],
            "featured_media": 44,
            "_embedded": {
                "author": [{ "name": "Alice" }],
                "wp:featuredmedia": [{ "source_url": "https://cms.example.test/a.jpg" }],
                "wp:term": [[{ "id": 5, "name": "News", "slug": "news" }]]
            }
        });

        let post: Post = serde_json::from_value(raw).unwrap();
        assert_eq!(post.slug, "open-day");
        let embedded = post.embedded.unwrap();
        assert_eq!(embedded.author_name(), Some("Alice"));
        assert_eq!(
            embedded.featured_image_url(),
            Some("https://cms.example.test/a.jpg")
        );
        assert_eq!(embedded.category_names(), vec!["News".to_string()]);
    }

    #[test]
    fn test_unknown_wire_fields_are_preserved() {
        let raw = json!({ "id": 1, "slug": "x", "status": "publish", "type": "post" });
        let post: Post = serde_json::from_value(raw).unwrap();
        assert_eq!(post.extra.get("status"), Some(&json!("publish")));

        let back = serde_json::to_value(&post).unwrap();
        assert_eq!(back["type"], json!("post"));
    }

    #[test]
    fn test_decorated_fields_are_skipped_when_absent() {
        let post = Post {
            id: 1,
            ..Default::default()
        };
        let value = serde_json::to_value(&post).unwrap();
        assert!(value.get("author_name").is_none());
        assert!(value.get("featured_image_url").is_none());
    }

    #[test]
    fn test_trainer_schedule_and_socials() {
        let trainer = Trainer {
            id: 7,
            acf: json!({
                "role": "Head coach",
                "schedule_monday": "9:00-12:00",
                "schedule_thursday": "15:00-19:00",
                "schedule_friday": "",
                "instagram_url": "https://instagram.com/coach",
            }),
            ..Default::default()
        };

        let schedule = trainer.weekly_schedule();
        assert_eq!(
            schedule,
            vec![
                ScheduleSlot {
                    day: "Monday",
                    time: "9:00-12:00".to_string()
                },
                ScheduleSlot {
                    day: "Thursday",
                    time: "15:00-19:00".to_string()
                },
            ]
        );

        let socials = trainer.social_links();
        assert_eq!(socials.len(), 1);
        assert_eq!(socials[0].platform, "instagram");
        assert_eq!(trainer.role(), Some("Head coach"));
    }
}
