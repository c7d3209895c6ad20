use crate::url::{CanonicalUrl, LinkCategory};
use url::Url;

/// Known extensions per category (without the leading dot)
const EXTENSIONS: &[(LinkCategory, &[&str])] = &[
    (
        LinkCategory::Page,
        &["html", "htm", "xhtml", "php", "asp", "aspx", "jsp", "do"],
    ),
    (
        LinkCategory::Document,
        &[
            "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "txt", "rtf",
            "csv",
        ],
    ),
    (
        LinkCategory::Image,
        &[
            "jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico", "tiff", "tif",
        ],
    ),
    (LinkCategory::Script, &["js", "mjs", "ts"]),
    (LinkCategory::Stylesheet, &["css", "scss", "sass", "less"]),
    (
        LinkCategory::Media,
        &[
            "mp4", "avi", "mov", "wmv", "flv", "webm", "mp3", "wav", "ogg", "m4a", "flac",
        ],
    ),
    (
        LinkCategory::Archive,
        &["zip", "rar", "7z", "tar", "gz", "bz2", "xz"],
    ),
];

/// Classifies a canonical URL by the extension of its path
///
/// # Classification Rules
///
/// | Path | Category | File type |
/// |------|----------|-----------|
/// | ends in `/` | Page | `html` |
/// | final segment has no `.` | Page | `html` |
/// | known extension | per table | extension |
/// | unknown extension | Other | extension |
///
/// # Examples
///
/// ```
/// use link_harvest::url::{canonicalize, classify};
/// use link_harvest::LinkCategory;
///
/// let url = canonicalize("/report.PDF", "https://example.com/").unwrap();
/// assert_eq!(classify(&url), (LinkCategory::Document, "pdf".to_string()));
///
/// let url = canonicalize("/blog/", "https://example.com/").unwrap();
/// assert_eq!(classify(&url), (LinkCategory::Page, "html".to_string()));
/// ```
pub fn classify(url: &CanonicalUrl) -> (LinkCategory, String) {
    match Url::parse(url.as_str()) {
        Ok(parsed) => classify_path(parsed.path()),
        Err(_) => (LinkCategory::Other, "unknown".to_string()),
    }
}

/// Classifies a raw URL path
pub fn classify_path(path: &str) -> (LinkCategory, String) {
    let path = path.to_lowercase();
    let segment = path.rsplit('/').next().unwrap_or("");

    if path.ends_with('/') || !segment.contains('.') {
        return (LinkCategory::Page, "html".to_string());
    }

    let extension = segment.rsplit('.').next().unwrap_or("");

    let category = EXTENSIONS
        .iter()
        .find(|(_, extensions)| extensions.contains(&extension))
        .map(|(category, _)| *category)
        .unwrap_or(LinkCategory::Other);

    (category, extension.to_string())
}
