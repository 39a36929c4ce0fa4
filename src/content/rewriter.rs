//! Origin asset classification and proxy URL rewriting
//!
//! Pages must never reference the content origin directly: its assets sit
//! behind basic auth and would fail or mix content in the browser. The
//! rewriter routes every origin asset URL through the local proxy endpoint
//! instead. Pure string work, no I/O.

use url::Url;

/// Extensions that mark a root-relative path as an image asset
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".avif", ".svg"];

/// Path fragments that identify origin media uploads
const UPLOAD_FRAGMENTS: &[&str] = &["/wp-content/uploads/", "/uploads/"];

#[derive(Clone, Debug)]
pub struct AssetRewriter {
    origin_host: String,
    origin_base: String,
    proxy_path: String,
    placeholder_path: String,
}

impl AssetRewriter {
    pub fn new(origin: &Url, proxy_path: &str, placeholder_path: &str) -> Self {
        Self {
            origin_host: origin.host_str().unwrap_or_default().to_string(),
            origin_base: origin.origin().ascii_serialization(),
            proxy_path: proxy_path.to_string(),
            placeholder_path: placeholder_path.to_string(),
        }
    }

    pub fn origin_host(&self) -> &str {
        &self.origin_host
    }

    /// Origin root (`scheme://host[:port]`), for resolving root-relative URLs
    pub fn origin_base(&self) -> &str {
        &self.origin_base
    }

    pub fn proxy_path(&self) -> &str {
        &self.proxy_path
    }

    /// True when the URL already points at the proxy or the placeholder.
    /// Rewriting such URLs again must be a no-op.
    pub fn is_proxy_url(&self, url: &str) -> bool {
        url.contains(&self.proxy_path) || url.contains(&self.placeholder_path)
    }

    /// Does this URL reference an asset on the content origin?
    ///
    /// Matches by host, by upload-path fragment, or by a root-relative path
    /// with an image extension. Already-proxied URLs never match.
    pub fn is_origin_asset(&self, url: &str) -> bool {
        if url.is_empty() || self.is_proxy_url(url) {
            return false;
        }

        if UPLOAD_FRAGMENTS.iter().any(|fragment| url.contains(fragment)) {
            return true;
        }

        if let Ok(parsed) = Url::parse(url) {
            return parsed.host_str() == Some(self.origin_host.as_str());
        }

        if url.starts_with('/') && !url.starts_with("//") {
            let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
            return IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext));
        }

        false
    }

    /// Rewrite an origin asset URL to route through the proxy endpoint.
    ///
    /// Root-relative URLs are resolved against the origin first. Foreign and
    /// already-proxied URLs pass through unchanged; an empty URL maps to the
    /// placeholder rather than an error.
    pub fn to_proxied(&self, url: &str) -> String {
        if url.is_empty() {
            return self.placeholder("Image unavailable");
        }
        if !self.is_origin_asset(url) {
            return url.to_string();
        }

        let full_url = if url.starts_with('/') && !url.starts_with("//") {
            format!("{}{}", self.origin_base, url)
        } else {
            url.to_string()
        };

        format!("{}?url={}", self.proxy_path, urlencoding::encode(&full_url))
    }

    /// Placeholder reference with a descriptive label, always renderable in
    /// an `<img>` slot
    pub fn placeholder(&self, text: &str) -> String {
        format!(
            "{}?height=400&width=400&text={}",
            self.placeholder_path,
            urlencoding::encode(text)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rewriter() -> AssetRewriter {
        let origin = Url::parse("https://cms.example.test").unwrap();
        AssetRewriter::new(&origin, "/api/image-proxy", "/placeholder.svg")
    }

    #[rstest]
    #[case("https://cms.example.test/wp-content/uploads/2024/05/hero.jpg")]
    #[case("https://cms.example.test/media/logo.png")]
    #[case("/wp-content/uploads/2024/05/hero.jpg")]
    #[case("/images/trainer.webp")]
    fn test_origin_assets_are_detected(#[case] url: &str) {
        assert!(rewriter().is_origin_asset(url));
    }

    #[rstest]
    #[case("https://example.org/pic.jpg")]
    #[case("https://instagram.com/p/abc")]
    #[case("/api/image-proxy?url=https%3A%2F%2Fcms.example.test%2Fa.jpg")]
    #[case("/placeholder.svg?height=400&width=400")]
    #[case("")]
    fn test_non_origin_urls_are_not_detected(#[case] url: &str) {
        assert!(!rewriter().is_origin_asset(url));
    }

    #[test]
    fn test_to_proxied_rewrites_absolute_origin_url() {
        let url = "https://cms.example.test/wp-content/uploads/a.jpg";
        assert_eq!(
            rewriter().to_proxied(url),
            format!("/api/image-proxy?url={}", urlencoding::encode(url))
        );
    }

    #[test]
    fn test_to_proxied_resolves_root_relative_urls() {
        assert_eq!(
            rewriter().to_proxied("/wp-content/uploads/a.jpg"),
            format!(
                "/api/image-proxy?url={}",
                urlencoding::encode("https://cms.example.test/wp-content/uploads/a.jpg")
            )
        );
    }

    #[rstest]
    #[case("https://example.org/pic.jpg")]
    #[case("https://cdn.example.org/uploads.html")]
    fn test_to_proxied_passes_foreign_urls_through(#[case] url: &str) {
        assert_eq!(rewriter().to_proxied(url), url);
    }

    #[rstest]
    #[case("https://cms.example.test/wp-content/uploads/a.jpg")]
    #[case("/wp-content/uploads/b.png")]
    #[case("https://example.org/untouched.jpg")]
    #[case("")]
    fn test_to_proxied_is_idempotent(#[case] url: &str) {
        let rewriter = rewriter();
        let once = rewriter.to_proxied(url);
        assert_eq!(rewriter.to_proxied(&once), once);
    }

    #[test]
    fn test_empty_url_maps_to_placeholder() {
        let result = rewriter().to_proxied("");
        assert!(result.starts_with("/placeholder.svg?"));
    }

    #[test]
    fn test_placeholder_encodes_label() {
        let result = rewriter().placeholder("Image not found");
        assert_eq!(
            result,
            "/placeholder.svg?height=400&width=400&text=Image%20not%20found"
        );
    }

    #[test]
    fn test_origin_with_port_is_respected() {
        let origin = Url::parse("http://127.0.0.1:8625").unwrap();
        let rewriter = AssetRewriter::new(&origin, "/api/image-proxy", "/placeholder.svg");
        assert_eq!(rewriter.origin_base(), "http://127.0.0.1:8625");
        assert!(rewriter.is_origin_asset("http://127.0.0.1:8625/media/a.jpg"));
    }
}
