use crate::url::CanonicalUrl;
use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// Host-less URLs (e.g. `urn:` or `sms:` references) return None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use link_harvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Removes a single leading `www.` label
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Decides whether a canonical URL belongs to the seed's site
///
/// A URL without a host is always internal. Otherwise the hosts are
/// compared case-insensitively after removing a leading `www.` from both.
/// Ports are not part of the comparison.
///
/// # Examples
///
/// ```
/// use link_harvest::url::{canonicalize, is_internal};
///
/// let url = canonicalize("https://WWW.Example.com/about", "https://example.com/").unwrap();
/// assert!(is_internal(&url, "example.com"));
///
/// let url = canonicalize("https://blog.example.com/", "https://example.com/").unwrap();
/// assert!(!is_internal(&url, "example.com"));
/// ```
pub fn is_internal(url: &CanonicalUrl, seed_host: &str) -> bool {
    match Url::parse(url.as_str()) {
        Ok(parsed) => is_internal_url(&parsed, seed_host),
        Err(_) => false,
    }
}

/// Same as [`is_internal`], for an already-parsed URL
pub fn is_internal_url(url: &Url, seed_host: &str) -> bool {
    let Some(host) = extract_domain(url) else {
        return true;
    };

    let seed_host = seed_host.to_lowercase();
    strip_www(&host) == strip_www(&seed_host)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_extract_simple_domain() {
        assert_eq!(
            extract_domain(&url("https://example.com/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_extract_with_port() {
        assert_eq!(
            extract_domain(&url("https://example.com:8080/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_extract_mixed_case() {
        assert_eq!(
            extract_domain(&url("https://Example.COM/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_extract_hostless() {
        assert_eq!(extract_domain(&url("urn:isbn:0451450523")), None);
    }

    #[test]
    fn test_same_host_is_internal() {
        assert!(is_internal_url(&url("https://example.com/a"), "example.com"));
    }

    #[test]
    fn test_www_prefix_ignored_on_both_sides() {
        assert!(is_internal_url(&url("https://www.example.com/a"), "example.com"));
        assert!(is_internal_url(&url("https://example.com/a"), "www.example.com"));
        assert!(is_internal_url(&url("https://www.example.com/a"), "WWW.EXAMPLE.COM"));
    }

    #[test]
    fn test_scheme_and_port_ignored() {
        assert!(is_internal_url(&url("http://example.com:8080/a"), "example.com"));
    }

    #[test]
    fn test_subdomain_is_external() {
        assert!(!is_internal_url(&url("https://blog.example.com/"), "example.com"));
    }

    #[test]
    fn test_other_host_is_external() {
        assert!(!is_internal_url(&url("https://other.org/"), "example.com"));
    }

    #[test]
    fn test_hostless_is_internal() {
        assert!(is_internal_url(&url("urn:isbn:0451450523"), "example.com"));
    }

    #[test]
    fn test_strip_www_only_once() {
        assert_eq!(strip_www("www.www.example.com"), "www.example.com");
        assert_eq!(strip_www("example.com"), "example.com");
    }
}
