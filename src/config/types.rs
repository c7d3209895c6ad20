use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Link-Harvest
///
/// Every section is optional in the TOML file; missing sections take their
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Default settings with the given depth bound
    pub fn with_max_depth(max_depth: u32) -> Self {
        let mut config = Self::default();
        config.crawler.max_depth = max_depth;
        config
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of hops from the seed along same-site page links
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of concurrent page fetches
    #[serde(
        rename = "max-concurrent-pages-open",
        default = "default_max_concurrent_pages_open"
    )]
    pub max_concurrent_pages_open: u32,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Overall run deadline (seconds); no deadline when absent
    #[serde(rename = "run-deadline-secs", default)]
    pub run_deadline_secs: Option<u64>,

    /// Skip TLS certificate verification
    #[serde(rename = "accept-invalid-certs", default)]
    pub accept_invalid_certs: bool,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn run_deadline(&self) -> Option<Duration> {
        self.run_deadline_secs.map(Duration::from_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_concurrent_pages_open: default_max_concurrent_pages_open(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            run_deadline_secs: None,
            accept_invalid_certs: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL)`, or `CrawlerName/Version`
    /// without a contact URL.
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one session folder per run; nothing is written when absent
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: Option<String>,

    /// Also write a markdown summary next to the JSON files
    #[serde(rename = "write-markdown", default = "default_write_markdown")]
    pub write_markdown: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            write_markdown: default_write_markdown(),
        }
    }
}

fn default_max_depth() -> u32 {
    1
}

fn default_max_concurrent_pages_open() -> u32 {
    8
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_crawler_name() -> String {
    "LinkHarvest".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_output_dir() -> Option<String> {
    Some("./scraping_results".to_string())
}

fn default_write_markdown() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_max_depth_keeps_defaults() {
        let config = Config::with_max_depth(4);

        assert_eq!(config.crawler.max_depth, 4);
        assert_eq!(config.crawler.max_concurrent_pages_open, 8);
        assert_eq!(config.crawler.request_timeout_secs, 15);
        assert_eq!(config.crawler.connect_timeout_secs, 10);
        assert!(config.crawler.run_deadline_secs.is_none());
        assert_eq!(config.output.output_dir.as_deref(), Some("./scraping_results"));
        assert!(config.output.write_markdown);
    }
}
