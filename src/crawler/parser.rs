//! HTML parser for extracting the homepage's links
//!
//! Links are returned exactly as the document presents them: every
//! `<a href>` in source order, resolved against the document base URL.
//! Nothing is filtered by scheme and duplicates are kept; both decisions
//! belong to the pipeline.

use scraper::{Html, Selector};
use url::Url;

/// Extracted information from the homepage
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Every hyperlink on the page as an absolute URL, in document order
    pub links: Vec<String>,
}

/// Parses HTML content and extracts links and the title
///
/// # Base URL
///
/// Relative links are resolved against the first `<base href>` when the
/// document has one (itself resolved against `page_url`), otherwise
/// against `page_url`.
///
/// # Example
///
/// ```
/// use webclone::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &page_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);
    let base_url = document_base_url(&document, page_url);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, &base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Determines the URL relative links are resolved against
fn document_base_url(document: &Html, page_url: &Url) -> Url {
    let Ok(base_selector) = Selector::parse("base[href]") else {
        return page_url.clone();
    };

    document
        .select(&base_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page_url.join(href).ok())
        .unwrap_or_else(|| page_url.clone())
}

/// Extracts every `<a href>` as an absolute URL
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL
///
/// An href that is already absolute is kept as written (trimmed) rather
/// than re-serialized, so `http://h` and `http://h/` stay distinct links.
/// Returns None when the href cannot be resolved, which is the only reason
/// a link is dropped here.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }

    base_url
        .join(href)
        .ok()
        .map(|absolute_url| absolute_url.to_string())
        .filter(|s| !s.is_empty())
}

/// Convenience function for extracting just the links from HTML
///
/// # Arguments
///
/// * `html` - The HTML content
/// * `page_url` - The URL the page was served from
///
/// # Returns
///
/// Absolute URLs in document order, duplicates included
pub fn extract_links_simple(html: &str, page_url: &Url) -> Vec<String> {
    parse_html(html, page_url).links
}
