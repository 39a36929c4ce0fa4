//! HTML fragment and field-tree transformation
//!
//! Upstream content embeds origin asset references in several shapes:
//! `src`/`srcset` attributes, inline `background-image` styles, bare URLs in
//! text, and free-form field bags (`acf`) of unknown structure. Everything
//! is rewritten through the [`AssetRewriter`] via plain string substitution;
//! the HTML is never parsed into a tree. Both entry points are idempotent,
//! since content may be transformed at more than one layer.

use crate::content::rewriter::AssetRewriter;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

#[derive(Clone, Debug)]
pub struct ContentTransformer {
    rewriter: AssetRewriter,
    src_attr: Regex,
    srcset_attr: Regex,
    background_url: Regex,
    absolute_upload: Regex,
    bare_upload: Regex,
}

impl ContentTransformer {
    pub fn new(rewriter: AssetRewriter) -> Self {
        let host = regex::escape(rewriter.origin_host());
        let absolute_upload = Regex::new(&format!(
            r#"https?://{host}(?::\d+)?/wp-content/uploads/[^"'\s)]+"#
        ))
        .expect("valid upload pattern");
        let bare_upload = Regex::new(&format!(
            r#"{host}(?::\d+)?/wp-content/uploads/[^"'\s)]+"#
        ))
        .expect("valid upload pattern");

        Self {
            rewriter,
            src_attr: Regex::new(r#"src="([^"]+)""#).expect("valid src pattern"),
            srcset_attr: Regex::new(r#"srcset="([^"]+)""#).expect("valid srcset pattern"),
            background_url: Regex::new(r#"background-image:\s*url\(\s*['"]?([^'")]+?)['"]?\s*\)"#)
                .expect("valid style pattern"),
            absolute_upload,
            bare_upload,
        }
    }

    pub fn rewriter(&self) -> &AssetRewriter {
        &self.rewriter
    }

    /// Rewrite every embedded origin asset reference in an HTML fragment.
    ///
    /// Non-matching text is left untouched; running the transform on its own
    /// output produces the same result.
    pub fn transform_html(&self, html: &str) -> String {
        if html.is_empty() {
            return html.to_string();
        }

        // Absolute origin upload URLs anywhere in the fragment
        let step = self
            .absolute_upload
            .replace_all(html, |caps: &Captures| self.rewriter.to_proxied(&caps[0]));

        let step = self.src_attr.replace_all(&step, |caps: &Captures| {
            format!(r#"src="{}""#, self.rewriter.to_proxied(&caps[1]))
        });

        let step = self.srcset_attr.replace_all(&step, |caps: &Captures| {
            format!(r#"srcset="{}""#, self.transform_srcset(&caps[1]))
        });

        let step = self.background_url.replace_all(&step, |caps: &Captures| {
            format!(
                "background-image: url('{}')",
                self.rewriter.to_proxied(caps[1].trim())
            )
        });

        // Protocol-less origin references left over in text nodes
        let step = self.bare_upload.replace_all(&step, |caps: &Captures| {
            let matched = &caps[0];
            let full_url = if matched.starts_with("http") {
                matched.to_string()
            } else {
                format!("https://{matched}")
            };
            self.rewriter.to_proxied(&full_url)
        });

        step.into_owned()
    }

    /// Each srcset candidate is a URL plus an optional width/density
    /// descriptor; the URL is rewritten, the descriptor preserved.
    fn transform_srcset(&self, srcset: &str) -> String {
        srcset
            .split(',')
            .map(|candidate| {
                let trimmed = candidate.trim();
                match trimmed.split_once(' ') {
                    Some((url, descriptor)) => {
                        format!("{} {}", self.rewriter.to_proxied(url), descriptor)
                    }
                    None => self.rewriter.to_proxied(trimmed),
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Depth-first walk of an arbitrary JSON tree: URL-shaped string leaves
    /// are rewritten, other strings go through the HTML transform, and
    /// `url`/`source_url` keys are rewritten directly. This is how free-form
    /// `acf` bags and `_embedded` media are decorated without per-field
    /// knowledge.
    pub fn transform_value(&self, value: &Value) -> Value {
        match value {
            Value::String(text) => Value::String(self.transform_string(text)),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.transform_value(item)).collect())
            }
            Value::Object(fields) => {
                let mut transformed = Map::with_capacity(fields.len());
                for (key, field) in fields {
                    let output = match field {
                        Value::String(text)
                            if (key == "url" || key == "source_url") && !text.is_empty() =>
                        {
                            Value::String(self.rewriter.to_proxied(text))
                        }
                        other => self.transform_value(other),
                    };
                    transformed.insert(key.clone(), output);
                }
                Value::Object(transformed)
            }
            other => other.clone(),
        }
    }

    fn transform_string(&self, text: &str) -> String {
        if self.rewriter.is_origin_asset(text) {
            self.rewriter.to_proxied(text)
        } else {
            self.transform_html(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use url::Url;

    const ORIGIN: &str = "https://cms.example.test";

    fn transformer() -> ContentTransformer {
        let origin = Url::parse(ORIGIN).unwrap();
        ContentTransformer::new(AssetRewriter::new(
            &origin,
            "/api/image-proxy",
            "/placeholder.svg",
        ))
    }

    fn proxied(url: &str) -> String {
        format!("/api/image-proxy?url={}", urlencoding::encode(url))
    }

    #[test]
    fn test_src_attribute_is_rewritten() {
        let url = format!("{ORIGIN}/wp-content/uploads/a.jpg");
        let html = format!(r#"<img src="{url}" alt="a">"#);
        let output = transformer().transform_html(&html);
        assert_eq!(output, format!(r#"<img src="{}" alt="a">"#, proxied(&url)));
    }

    #[test]
    fn test_foreign_src_attribute_is_untouched() {
        let html = r#"<img src="https://example.org/pic.jpg">"#;
        assert_eq!(transformer().transform_html(html), html);
    }

    #[test]
    fn test_srcset_candidates_keep_descriptors() {
        let small = format!("{ORIGIN}/wp-content/uploads/a-300.jpg");
        let large = format!("{ORIGIN}/wp-content/uploads/a-1024.jpg");
        let html = format!(r#"<img srcset="{small} 300w, {large} 1024w">"#);
        let output = transformer().transform_html(&html);
        assert_eq!(
            output,
            format!(
                r#"<img srcset="{} 300w, {} 1024w">"#,
                proxied(&small),
                proxied(&large)
            )
        );
    }

    #[test]
    fn test_background_image_style_is_rewritten() {
        let url = format!("{ORIGIN}/wp-content/uploads/bg.jpg");
        let html = format!(r#"<div style="background-image: url('{url}')"></div>"#);
        let output = transformer().transform_html(&html);
        assert_eq!(
            output,
            format!(
                r#"<div style="background-image: url('{}')"></div>"#,
                proxied(&url)
            )
        );
    }

    #[test]
    fn test_bare_origin_reference_in_text_is_rewritten() {
        let html = format!("see cms.example.test/wp-content/uploads/flyer.pdf for details");
        let output = transformer().transform_html(&html);
        assert_eq!(
            output,
            format!(
                "see {} for details",
                proxied("https://cms.example.test/wp-content/uploads/flyer.pdf")
            )
        );
    }

    #[test]
    fn test_transform_html_is_idempotent() {
        let url = format!("{ORIGIN}/wp-content/uploads/a.jpg");
        let html = format!(
            r#"<img src="{url}" srcset="{url} 300w"><div style="background-image: url({url})"></div>"#
        );
        let transformer = transformer();
        let once = transformer.transform_html(&html);
        assert_eq!(transformer.transform_html(&once), once);
    }

    #[test]
    fn test_plain_text_is_untouched() {
        let html = "<p>Allenamento funzionale three times a week</p>";
        assert_eq!(transformer().transform_html(html), html);
    }

    #[test]
    fn test_field_tree_rewrites_url_shaped_strings() {
        let url = format!("{ORIGIN}/wp-content/uploads/card.jpg");
        let tree = json!({
            "level": "beginner",
            "card_image": url,
            "gallery": [url, "https://example.org/keep.jpg"],
        });
        let output = transformer().transform_value(&tree);
        assert_eq!(output["card_image"], json!(proxied(&url)));
        assert_eq!(output["gallery"][0], json!(proxied(&url)));
        assert_eq!(output["gallery"][1], json!("https://example.org/keep.jpg"));
        assert_eq!(output["level"], json!("beginner"));
    }

    #[test]
    fn test_field_tree_rewrites_url_keys_in_nested_objects() {
        let url = format!("{ORIGIN}/wp-content/uploads/media.jpg");
        let tree = json!({
            "media": { "url": url, "width": 800 },
            "sizes": { "thumbnail": { "source_url": url } },
        });
        let output = transformer().transform_value(&tree);
        assert_eq!(output["media"]["url"], json!(proxied(&url)));
        assert_eq!(output["media"]["width"], json!(800));
        assert_eq!(output["sizes"]["thumbnail"]["source_url"], json!(proxied(&url)));
    }

    #[test]
    fn test_field_tree_transforms_html_strings() {
        let url = format!("{ORIGIN}/wp-content/uploads/inline.jpg");
        let tree = json!({ "benefits": format!(r#"<img src="{url}">"#) });
        let output = transformer().transform_value(&tree);
        assert_eq!(
            output["benefits"],
            json!(format!(r#"<img src="{}">"#, proxied(&url)))
        );
    }

    #[test]
    fn test_field_tree_leaves_scalars_alone() {
        let tree = json!({ "max_participants": 12, "active": true, "note": null });
        assert_eq!(transformer().transform_value(&tree), tree);
    }

    #[test]
    fn test_field_tree_is_idempotent() {
        let url = format!("{ORIGIN}/wp-content/uploads/a.jpg");
        let tree = json!({
            "image": url,
            "content": format!(r#"<img src="{url}">"#),
            "media": { "source_url": url },
        });
        let transformer = transformer();
        let once = transformer.transform_value(&tree);
        assert_eq!(transformer.transform_value(&once), once);
    }
}
