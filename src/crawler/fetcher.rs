//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client from configuration
//! - GET requests for page content, with transparent body decoding
//! - Status, content-encoding and content-type validation
//! - HEAD probing of the seed before a run
//! - Error classification

use crate::config::Config;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_ENCODING,
    CONTENT_TYPE, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::{redirect::Policy, Client};
use thiserror::Error;

/// Maximum number of redirects the client follows for one request
const MAX_REDIRECTS: usize = 10;

/// Content types accepted as HTML
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value
    pub content_type: String,
    /// Decoded page body
    pub body: String,
}

/// Reasons a page fetch fails
///
/// Every variant is a per-page failure: it is recorded in the run's error
/// log and ends only the branch that issued the fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("error making request: {0}")]
    Request(String),

    #[error("HTTP status code: {0}")]
    Status(u16),

    #[error("unsupported content encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("non-HTML content detected: {0}")]
    NotHtml(String),

    #[error("error reading body: {0}")]
    Body(String),
}

impl FetchError {
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client is shared by every fetch of a run. It follows up to ten
/// redirects and transparently decodes gzip, deflate and brotli bodies.
///
/// # Example
///
/// ```
/// use link_harvest::config::Config;
/// use link_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .default_headers(headers)
        .timeout(config.crawler.request_timeout())
        .connect_timeout(config.crawler.connect_timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .danger_accept_invalid_certs(config.crawler.accept_invalid_certs)
        .build()
}

/// Fetches a page and validates that it is HTML
///
/// # Request Flow
///
/// 1. Send GET request (client timeout applies)
/// 2. Reject any status outside `[200, 300)`
/// 3. Reject a `Content-Encoding` the client left undecoded
/// 4. Reject a `Content-Type` that is not HTML
/// 5. Read the decoded body
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(FetchError::from_transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    // The client strips Content-Encoding from every body it decoded
    if let Some(encoding) = header_str(response.headers(), CONTENT_ENCODING) {
        let encoding = encoding.trim().to_ascii_lowercase();
        if !encoding.is_empty() && encoding != "identity" {
            return Err(FetchError::UnsupportedEncoding(encoding));
        }
    }

    let content_type = header_str(response.headers(), CONTENT_TYPE)
        .unwrap_or_default()
        .to_string();
    if !is_html_content_type(&content_type) {
        return Err(FetchError::NotHtml(content_type));
    }

    let final_url = response.url().to_string();
    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Body(e.to_string()))?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        content_type,
        body,
    })
}

/// Sends a HEAD request and returns the status code
///
/// Used as a connection test before a run; the caller decides whether a
/// failure matters.
pub async fn probe_url(client: &Client, url: &str) -> Result<u16, FetchError> {
    let response = client
        .head(url)
        .send()
        .await
        .map_err(FetchError::from_transport)?;
    Ok(response.status().as_u16())
}

/// Returns true if a Content-Type header value denotes HTML
pub fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    HTML_CONTENT_TYPES
        .iter()
        .any(|html| content_type.contains(html))
}

fn header_str(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
