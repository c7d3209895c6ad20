//! URL handling module for Link-Harvest
//!
//! This module provides URL canonicalization, link classification by path
//! extension, and the same-site membership test.

mod classify;
mod domain;
mod normalize;

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::{UrlError, UrlResult};

// Re-export main functions
pub use classify::{classify, classify_path};
pub use domain::{extract_domain, is_internal, is_internal_url, strip_www};
pub use normalize::{canonicalize, canonicalize_against, TRACKING_PARAMS};

/// An absolute, fragment-free URL with tracking parameters removed
///
/// Values are only produced by [`canonicalize`] and friends, so every
/// `CanonicalUrl` re-canonicalizes to itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub(crate) fn from_url(url: Url) -> Self {
        Self(url.into())
    }

    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the canonical string back into a [`Url`]
    pub fn to_url(&self) -> Option<Url> {
        Url::parse(&self.0).ok()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Content-type category of a discovered link
///
/// The serialized names are the bucket names used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LinkCategory {
    /// HTML pages, including extensionless and directory-style routes
    #[serde(rename = "html_pages")]
    Page,
    #[serde(rename = "documents")]
    Document,
    #[serde(rename = "images")]
    Image,
    #[serde(rename = "scripts")]
    Script,
    #[serde(rename = "stylesheets")]
    Stylesheet,
    /// Audio and video
    #[serde(rename = "multimedia")]
    Media,
    #[serde(rename = "archives")]
    Archive,
    /// Anything with an unrecognized extension
    #[serde(rename = "other")]
    Other,
}

impl LinkCategory {
    /// Returns all categories in report order
    pub fn all() -> [Self; 8] {
        [
            Self::Page,
            Self::Document,
            Self::Image,
            Self::Script,
            Self::Stylesheet,
            Self::Media,
            Self::Archive,
            Self::Other,
        ]
    }

    /// Returns the bucket name used in reports and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "html_pages",
            Self::Document => "documents",
            Self::Image => "images",
            Self::Script => "scripts",
            Self::Stylesheet => "stylesheets",
            Self::Media => "multimedia",
            Self::Archive => "archives",
            Self::Other => "other",
        }
    }

    /// Returns a human-readable label for console and markdown output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Page => "HTML Pages",
            Self::Document => "Documents",
            Self::Image => "Images",
            Self::Script => "Scripts",
            Self::Stylesheet => "Stylesheets",
            Self::Media => "Multimedia",
            Self::Archive => "Archives",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses and validates a seed URL
///
/// The seed must be an absolute `http` or `https` URL with a host. Its
/// fragment is dropped so it can serve as a canonical base.
///
/// # Examples
///
/// ```
/// use link_harvest::url::parse_seed;
///
/// let seed = parse_seed("https://example.com/start#top").unwrap();
/// assert_eq!(seed.as_str(), "https://example.com/start");
/// assert!(parse_seed("mailto:someone@example.com").is_err());
/// ```
pub fn parse_seed(seed: &str) -> UrlResult<Url> {
    let mut url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    Ok(url)
}
