// src/extract/links.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// Two sources of links:
// - href and src attributes, found with the `scraper` crate (CSS selectors)
// - bare http(s) URLs written in the page text, found with a regex
//
// Every candidate is resolved against the page URL with the `url` crate, and
// only absolute http/https URLs are kept. A BTreeSet removes duplicates and
// keeps the output order stable.
// =============================================================================

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

// Extracts all outbound http/https links from HTML content
//
// Parameters:
//   html: the page content
//   base_url: the URL the page was fetched from (for relative links)
//
// Returns: deduplicated absolute URLs
//
// Example:
//   html = "<a href='/docs'>Docs</a> see https://other.example/x"
//   base_url = "https://example.com/page"
//   result = {"https://example.com/docs", "https://other.example/x"}
pub fn extract_links(html: &str, base_url: &str) -> BTreeSet<String> {
    let mut links = BTreeSet::new();

    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            warn!(base_url, error = %e, "invalid base URL, no links extracted");
            return links;
        }
    };

    let document = Html::parse_document(html);

    for element in document.select(link_selector()) {
        for attr in ["href", "src"] {
            if let Some(value) = element.value().attr(attr) {
                if let Some(url) = resolve_link(&base, value) {
                    links.insert(url);
                }
            }
        }
    }

    // Bare URLs in text nodes (not attributes, those were handled above)
    for text in document.root_element().text() {
        for found in bare_url_regex().find_iter(text) {
            if let Some(url) = resolve_link(&base, found.as_str()) {
                links.insert(url);
            }
        }
    }

    links
}

// Resolves a link (possibly relative) to an absolute http/https URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs"              -> Some("https://example.com/docs")
//   href = "//cdn.example/x.js" -> Some("https://cdn.example/x.js")
//   href = "#section"           -> None
//   href = "mailto:a@b.c"       -> None
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
        || href.starts_with("data:")
    {
        return None;
    }

    // join() handles absolute, protocol-relative and relative references
    let url = base.join(href).ok()?;

    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

fn link_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    // Constant selector, known to be valid
    SELECTOR.get_or_init(|| Selector::parse("[href], [src]").unwrap())
}

fn bare_url_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r#"(?i)https?://[^\s<>"'{}|\\^`\[\]]+"#).unwrap())
}
