//! Text helpers for rendered CMS content
//!
//! Server-side counterparts of the usual browser conveniences: entity
//! decoding without a `document`, tag stripping without a DOM parser.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(\d+);").expect("valid entity pattern"));

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Decode the HTML entities the upstream CMS emits in titles and excerpts
pub fn decode_html_entities(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let decoded = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&nbsp;", " ");

    NUMERIC_ENTITY
        .replace_all(&decoded, |caps: &Captures| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Plain text of an HTML fragment: tags removed, whitespace normalized
pub fn strip_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let without_tags = HTML_TAG.replace_all(html, "");
    WHITESPACE_RUN
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Truncate to at most `limit` words, appending an ellipsis when cut
pub fn limit_words(text: &str, limit: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let words: Vec<&str> = text.split(' ').collect();
    if words.len() > limit {
        format!("{}...", words[..limit].join(" "))
    } else {
        text.to_string()
    }
}

/// Split a multi-line textarea field into trimmed, non-empty lines
pub fn text_area_to_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(
            decode_html_entities("Strength &amp; Conditioning &quot;PRO&quot;"),
            r#"Strength & Conditioning "PRO""#
        );
        assert_eq!(decode_html_entities("It&#039;s open"), "It's open");
        assert_eq!(decode_html_entities("a&nbsp;b"), "a b");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_html_entities("caff&#232;"), "caffè");
        // Out-of-range code points stay as-is
        assert_eq!(decode_html_entities("&#1114112;"), "&#1114112;");
    }

    #[test]
    fn test_decode_empty_input() {
        assert_eq!(decode_html_entities(""), "");
    }

    #[test]
    fn test_strip_html_removes_tags_and_normalizes_whitespace() {
        assert_eq!(
            strip_html("<p>Functional   training</p>\n<p>every day</p>"),
            "Functional training every day"
        );
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_limit_words_truncates_with_ellipsis() {
        assert_eq!(limit_words("one two three four", 2), "one two...");
        assert_eq!(limit_words("one two", 5), "one two");
        assert_eq!(limit_words("", 5), "");
    }

    #[test]
    fn test_text_area_to_lines_trims_and_filters() {
        let block = "CrossFit Level 1\n\n  Kettlebell cert  \n";
        assert_eq!(
            text_area_to_lines(block),
            vec!["CrossFit Level 1".to_string(), "Kettlebell cert".to_string()]
        );
        assert!(text_area_to_lines("").is_empty());
    }
}
