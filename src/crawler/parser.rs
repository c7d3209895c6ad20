//! HTML parser for extracting link references and metadata
//!
//! This module handles parsing HTML content to extract:
//! - Raw link references from every element kind the harvester records
//! - Page title
//!
//! Extraction returns hrefs exactly as written; resolution against the page
//! URL happens during canonicalization.

use scraper::{ElementRef, Html, Selector};

/// The HTML element a link reference was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `<a href>`
    Anchor,
    /// `<link rel="canonical" href>`
    Canonical,
    /// `<link rel="alternate" href>`
    Alternate,
    /// `<img src>`
    Image,
    /// `<script src>`
    Script,
    /// `<link rel="stylesheet" href>`
    Stylesheet,
    /// `<source src>` inside `<video>` or `<audio>`
    Media,
    /// `<iframe src>`
    Iframe,
}

impl ElementKind {
    /// Returns true for the kinds whose targets may be followed
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::Anchor | Self::Canonical | Self::Alternate)
    }
}

/// A link reference as written in the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub href: String,
    pub kind: ElementKind,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Every link reference found on the page, in extraction order
    pub links: Vec<RawLink>,
}

/// Where each element kind keeps its reference
enum Source {
    Href,
    Src,
    /// `link[href]`, split on the `rel` value
    RelLink,
}

/// Extraction order; within one selector, document order
const EXTRACTORS: &[(&str, Source, ElementKind)] = &[
    ("a[href]", Source::Href, ElementKind::Anchor),
    ("link[href]", Source::RelLink, ElementKind::Canonical),
    ("img[src]", Source::Src, ElementKind::Image),
    ("script[src]", Source::Src, ElementKind::Script),
    ("link[rel~='stylesheet'][href]", Source::Href, ElementKind::Stylesheet),
    ("video source[src], audio source[src]", Source::Src, ElementKind::Media),
    ("iframe[src]", Source::Src, ElementKind::Iframe),
];

/// Parses HTML content and extracts link references and the title
///
/// # Link Extraction Rules
///
/// | Selector | Attribute | Kind |
/// |----------|-----------|------|
/// | `a` | `href` | Anchor |
/// | `link` with `rel` containing `canonical` / `alternate` | `href` | Canonical / Alternate |
/// | `img` | `src` | Image |
/// | `script` | `src` | Script |
/// | `link rel="stylesheet"` | `href` | Stylesheet |
/// | `source` inside `video` or `audio` | `src` | Media |
/// | `iframe` | `src` | Iframe |
///
/// Malformed markup never fails: the parser recovers the same way browsers do.
///
/// # Example
///
/// ```
/// use link_harvest::crawler::{parse_html, ElementKind};
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links[0].href, "/page");
/// assert_eq!(parsed.links[0].kind, ElementKind::Anchor);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document),
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

/// Extracts every link reference from the HTML document
pub fn extract_links(document: &Html) -> Vec<RawLink> {
    let mut links = Vec::new();

    for (css, source, kind) in EXTRACTORS {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };

        for element in document.select(&selector) {
            if let Some(link) = read_link(element, source, *kind) {
                links.push(link);
            }
        }
    }

    links
}

fn read_link(element: ElementRef<'_>, source: &Source, kind: ElementKind) -> Option<RawLink> {
    let node = element.value();
    let (href, kind) = match source {
        Source::Href => (node.attr("href")?, kind),
        Source::Src => (node.attr("src")?, kind),
        Source::RelLink => {
            let rel = node.attr("rel")?.to_ascii_lowercase();
            let kind = if rel.contains("canonical") {
                ElementKind::Canonical
            } else if rel.contains("alternate") {
                ElementKind::Alternate
            } else {
                return None;
            };
            (node.attr("href")?, kind)
        }
    };

    Some(RawLink {
        href: href.to_string(),
        kind,
    })
}
