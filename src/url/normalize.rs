use crate::url::CanonicalUrl;
use url::Url;

/// Query parameters removed during canonicalization
pub const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
];

/// Schemes that never lead to a fetchable document
const REJECTED_SCHEMES: &[&str] = &["javascript", "mailto", "tel", "ftp", "file", "data"];

/// Canonicalizes a reference found on a page
///
/// # Canonicalization Steps
///
/// 1. Trim surrounding whitespace from `href`
/// 2. Drop empty references and bare fragments (`#...`)
/// 3. Resolve `href` against `base` using relative-reference rules
/// 4. Drop `javascript:`, `mailto:`, `tel:`, `ftp:`, `file:`, `data:` targets
/// 5. Remove the fragment
/// 6. Remove tracking query parameters and sort the rest by name
///
/// # Arguments
///
/// * `href` - The raw attribute value
/// * `base` - The address of the page the reference was found on
///
/// # Returns
///
/// * `Some(CanonicalUrl)` - The canonical form
/// * `None` - The reference is not fetchable, or `href`/`base` is malformed
///
/// # Examples
///
/// ```
/// use link_harvest::url::canonicalize;
///
/// let url = canonicalize("../img.png", "https://ex.com/a/b").unwrap();
/// assert_eq!(url.as_str(), "https://ex.com/img.png");
///
/// let url = canonicalize("https://ex.com/page?utm_source=x&id=7#top", "https://ex.com/").unwrap();
/// assert_eq!(url.as_str(), "https://ex.com/page?id=7");
///
/// assert!(canonicalize("javascript:void(0)", "https://ex.com/").is_none());
/// ```
pub fn canonicalize(href: &str, base: &str) -> Option<CanonicalUrl> {
    let base = Url::parse(base).ok()?;
    canonicalize_against(href, &base)
}

/// Canonicalizes `href` against an already-parsed base
pub fn canonicalize_against(href: &str, base: &Url) -> Option<CanonicalUrl> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut resolved = base.join(href).ok()?;

    if REJECTED_SCHEMES.contains(&resolved.scheme()) {
        return None;
    }

    resolved.set_fragment(None);
    strip_tracking_params(&mut resolved);

    Some(CanonicalUrl::from_url(resolved))
}

/// Removes tracking parameters and re-serializes the remainder in key order
///
/// The sort is stable, so repeated keys keep their relative order.
fn strip_tracking_params(url: &mut Url) {
    if url.query().is_none() {
        return;
    }

    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    if params.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(params.iter());
    }
}
