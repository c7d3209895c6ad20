//! Integration tests for Link-Harvest
//!
//! Every test runs against a wiremock server on 127.0.0.1, so the seed host
//! is `127.0.0.1` and absolute links to other hosts count as external.

mod crawl_tests;
mod output_tests;

use link_harvest::config::Config;
use wiremock::ResponseTemplate;

/// A 200 response carrying HTML
pub fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// Test configuration: no persistence, short timeouts
pub fn test_config(max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.max_concurrent_pages_open = 4;
    config.crawler.request_timeout_secs = 5;
    config.crawler.connect_timeout_secs = 2;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.output_dir = None;
    config
}
