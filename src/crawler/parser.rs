//! HTML parser for extracting page data
//!
//! This module turns a fetched HTML document into a [`PageRecord`]:
//! - The first `<h1>` heading
//! - The first paragraph, preferring one inside `<main>`
//! - Outgoing links from `<a href>` tags
//! - Image references from `<img src>` tags

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

/// Data extracted from one successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    /// The URL the page was requested with (not normalized)
    pub url: String,

    /// Text of the first `<h1>`, empty if there is none
    pub heading: String,

    /// Text of the first paragraph, empty if there is none
    pub first_paragraph: String,

    /// Every link target on the page, as absolute URLs
    pub outgoing_links: Vec<String>,

    /// Every image source on the page, as absolute URLs
    pub image_urls: Vec<String>,
}

/// Parses HTML content and builds the page record
///
/// Relative references are resolved against `page_url`. References that do
/// not resolve are skipped; if `page_url` itself does not parse, no links or
/// images are reported.
///
/// # Example
///
/// ```
/// use site_ripple::crawler::extract_page_data;
///
/// let html = r#"<html><body><h1>Test Title</h1><a href="/link1">Link</a></body></html>"#;
/// let record = extract_page_data(html, "https://blog.boot.dev");
/// assert_eq!(record.heading, "Test Title");
/// assert_eq!(record.outgoing_links, vec!["https://blog.boot.dev/link1"]);
/// ```
pub fn extract_page_data(html: &str, page_url: &str) -> PageRecord {
    let document = Html::parse_document(html);
    let base_url = Url::parse(page_url).ok();

    let (outgoing_links, image_urls) = match &base_url {
        Some(base) => (
            collect_resolved(&document, "a[href]", "href", base),
            collect_resolved(&document, "img[src]", "src", base),
        ),
        None => {
            tracing::debug!("Cannot resolve references against {}", page_url);
            (Vec::new(), Vec::new())
        }
    };

    PageRecord {
        url: page_url.to_string(),
        heading: first_heading(&document),
        first_paragraph: first_paragraph(&document),
        outgoing_links,
        image_urls,
    }
}

/// Returns the text of the first `<h1>` in document order
pub fn get_heading(html: &str) -> String {
    first_heading(&Html::parse_document(html))
}

/// Returns the text of the first paragraph
///
/// A paragraph inside the first `<main>` wins over earlier paragraphs
/// elsewhere in the document.
pub fn get_first_paragraph(html: &str) -> String {
    first_paragraph(&Html::parse_document(html))
}

/// Returns every `<a href>` target resolved against `base_url`
pub fn get_urls(html: &str, base_url: &Url) -> Vec<String> {
    collect_resolved(&Html::parse_document(html), "a[href]", "href", base_url)
}

/// Returns every `<img src>` resolved against `base_url`
pub fn get_images(html: &str, base_url: &Url) -> Vec<String> {
    collect_resolved(&Html::parse_document(html), "img[src]", "src", base_url)
}

fn first_heading(document: &Html) -> String {
    let Ok(h1_selector) = Selector::parse("h1") else {
        return String::new();
    };

    document
        .select(&h1_selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn first_paragraph(document: &Html) -> String {
    let (Ok(main_selector), Ok(p_selector)) = (Selector::parse("main"), Selector::parse("p"))
    else {
        return String::new();
    };

    let in_main = document
        .select(&main_selector)
        .next()
        .and_then(|main| main.select(&p_selector).next());

    in_main
        .or_else(|| document.select(&p_selector).next())
        .map(element_text)
        .unwrap_or_default()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Collects one attribute from every matching element, resolved to absolute URLs
fn collect_resolved(document: &Html, selector: &str, attr: &str, base_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .filter_map(|reference| resolve_reference(reference, base_url))
        .collect()
}

/// Resolves a reference to an absolute URL, None if it is malformed
fn resolve_reference(reference: &str, base_url: &Url) -> Option<String> {
    match base_url.join(reference.trim()) {
        Ok(absolute_url) => Some(absolute_url.to_string()),
        Err(e) => {
            tracing::trace!("Skipping malformed reference '{}': {}", reference, e);
            None
        }
    }
}
