//! Integration tests for report persistence

use crate::{html_page, test_config};
use link_harvest::output::{prepare_output_dir, save_results, MARKDOWN_FILE, SUMMARY_FILE};
use link_harvest::run_with_config;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

#[tokio::test]
async fn test_session_directory_contents() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><head><link rel="stylesheet" href="/main.css"></head><body>
                <a href="/about">About</a>
                <a href="/files/archive.zip">Archive</a>
                <img src="/hero.webp">
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let result = run_with_config(&format!("{}/", server.uri()), test_config(0), None)
        .await
        .unwrap();

    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("results");
    prepare_output_dir(&output_dir).unwrap();

    let session = save_results(&result, &output_dir, true).unwrap();
    let session_name = session.file_name().unwrap().to_string_lossy().to_string();
    assert!(session_name.starts_with("127_0_0_1_"));

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(session.join(SUMMARY_FILE)).unwrap()).unwrap();
    assert_eq!(summary["base_url"], format!("{}/", server.uri()));
    assert_eq!(summary["total_links"], 4);
    assert_eq!(summary["statistics"]["pages_visited"], 1);
    assert_eq!(summary["category_summary"]["archives"], 1);
    assert_eq!(summary["category_summary"]["multimedia"], 0);
    assert_eq!(summary["classified_links"].as_object().unwrap().len(), 8);

    for file in ["html_pages.json", "archives.json", "images.json", "stylesheets.json"] {
        assert!(session.join(file).exists(), "missing {}", file);
    }
    assert!(!session.join("documents.json").exists());

    let markdown = fs::read_to_string(session.join(MARKDOWN_FILE)).unwrap();
    assert!(markdown.contains("| Archives | 1 |"));
}
