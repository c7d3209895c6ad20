//! Integration tests for the traversal
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full harvest cycle end-to-end.

use crate::{html_page, test_config};
use link_harvest::{run, run_with_config, HarvestError, LinkCategory, ProgressEvent, ProgressSink};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn strings(links: &[link_harvest::CanonicalUrl]) -> Vec<String> {
    links.iter().map(|l| l.to_string()).collect()
}

#[tokio::test]
async fn test_depth_zero_partitions_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><body>
                <a href="/one">One</a>
                <a href="/two">Two</a>
                <a href="three">Three</a>
                <a href="https://external.example/">Ext 1</a>
                <a href="https://another.example/page">Ext 2</a>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    // Depth is exhausted at the seed, so nothing else is fetched
    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(html_page("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let result = run_with_config(&format!("{}/", base), test_config(0), None)
        .await
        .unwrap();

    assert_eq!(result.statistics.pages_visited, 1);
    assert_eq!(result.internal_links.len(), 3);
    assert_eq!(result.external_links.len(), 2);
    assert_eq!(result.category_count(LinkCategory::Page), 5);
    assert!(result.errors.is_empty());
    assert_eq!(result.statistics.max_depth_reached, 0);
    assert!(result.is_consistent());
}

#[tokio::test]
async fn test_shared_link_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/a">A</a><a href="/b">B</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(r#"<a href="/shared">Shared</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page(r#"<a href="/shared#footer">Shared</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(html_page("<p>shared</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let result = run_with_config(&format!("{}/", server.uri()), test_config(2), None)
        .await
        .unwrap();

    let shared = format!("{}/shared", server.uri());
    let all = strings(&result.all_links);
    assert_eq!(all.iter().filter(|l| **l == shared).count(), 1);
    assert_eq!(result.statistics.pages_visited, 4);
    assert_eq!(result.statistics.max_depth_reached, 2);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_not_found_does_not_stop_siblings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/missing">Missing</a><a href="/present">Present</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/present"))
        .respond_with(html_page(r#"<img src="/photo.jpg">"#))
        .expect(1)
        .mount(&server)
        .await;

    let result = run_with_config(&format!("{}/", server.uri()), test_config(1), None)
        .await
        .unwrap();

    assert_eq!(result.statistics.pages_visited, 3);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("/missing"));
    assert!(result.errors[0].contains("404"));
    assert_eq!(result.category_count(LinkCategory::Image), 1);
}

#[tokio::test]
async fn test_non_html_page_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/api/status">Status</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"ok":true}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let result = run_with_config(&format!("{}/", server.uri()), test_config(1), None)
        .await
        .unwrap();

    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("non-HTML content"));
    // The link itself stays registered
    assert_eq!(result.total_links, 1);
}

#[tokio::test]
async fn test_all_error_run_still_yields_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = run(&format!("{}/", server.uri()), 3, None).await.unwrap();

    assert_eq!(result.total_links, 0);
    assert_eq!(result.statistics.pages_visited, 1);
    assert_eq!(result.statistics.errors_count, 1);
    assert!(result.errors[0].contains("500"));
}

#[tokio::test]
async fn test_depth_bound_stops_recursion() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/level1">1</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/level1"))
        .respond_with(html_page(r#"<a href="/level2">2</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html_page(r#"<a href="/level3">3</a>"#))
        .expect(0)
        .mount(&server)
        .await;

    let result = run_with_config(&format!("{}/", server.uri()), test_config(1), None)
        .await
        .unwrap();

    assert_eq!(result.statistics.pages_visited, 2);
    // level2 is discovered and registered without being fetched
    assert!(strings(&result.internal_links).contains(&format!("{}/level2", server.uri())));
}

#[tokio::test]
async fn test_resource_links_are_not_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><head><script src="/bundle"></script></head><body>
                <img src="/avatar">
                <iframe src="/widget"></iframe>
                <a href="/report.pdf">Report</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;
    for route in ["/bundle", "/avatar", "/widget", "/report.pdf"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html_page("<p>never</p>"))
            .expect(0)
            .mount(&server)
            .await;
    }

    let result = run_with_config(&format!("{}/", server.uri()), test_config(2), None)
        .await
        .unwrap();

    assert_eq!(result.statistics.pages_visited, 1);
    assert_eq!(result.total_links, 4);
    assert_eq!(result.category_count(LinkCategory::Document), 1);
}

#[tokio::test]
async fn test_canonical_and_alternate_links_are_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><head>
                <link rel="canonical" href="/home">
                <link rel="alternate" hreflang="de" href="/de/">
            </head></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(html_page("<p>home</p>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/de/"))
        .respond_with(html_page("<p>de</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let result = run_with_config(&format!("{}/", server.uri()), test_config(1), None)
        .await
        .unwrap();

    assert_eq!(result.statistics.pages_visited, 3);
}

#[tokio::test]
async fn test_tracking_parameters_are_deduplicated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/post?utm_source=feed&id=7">1</a>
               <a href="/post?id=7&fbclid=abc">2</a>
               <a href="/post?id=7#comments">3</a>"#,
        ))
        .mount(&server)
        .await;

    let result = run_with_config(&format!("{}/", server.uri()), test_config(0), None)
        .await
        .unwrap();

    assert_eq!(
        strings(&result.all_links),
        vec![format!("{}/post?id=7", server.uri())]
    );
}

#[tokio::test]
async fn test_progress_events() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/next">Next</a><img src="/a.png">"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page("<p>end</p>"))
        .mount(&server)
        .await;

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink_events = Arc::clone(&events);
    let sink: ProgressSink = Arc::new(move |event: ProgressEvent| {
        sink_events.lock().unwrap().push(event);
    });

    let result = run_with_config(&format!("{}/", server.uri()), test_config(1), Some(sink))
        .await
        .unwrap();

    let events = events.lock().unwrap();
    let fetches: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::Fetching { depth, url } => Some((*depth, url.clone())),
            _ => None,
        })
        .collect();

    assert_eq!(fetches.len(), result.statistics.pages_visited);
    assert_eq!(fetches[0], (0, format!("{}/", server.uri())));
    assert_eq!(fetches[1], (1, format!("{}/next", server.uri())));

    assert!(events.contains(&ProgressEvent::CategoryTotal {
        category: LinkCategory::Image,
        count: 1,
    }));
    assert!(!events.iter().any(|e| matches!(
        e,
        ProgressEvent::CategoryTotal {
            category: LinkCategory::Archive,
            ..
        }
    )));
}

#[tokio::test]
async fn test_run_deadline_abandons_slow_fetches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("<p>slow</p>").set_delay(Duration::from_secs(4)))
        .mount(&server)
        .await;

    let mut config = test_config(1);
    config.crawler.run_deadline_secs = Some(1);

    let started = std::time::Instant::now();
    let result = run_with_config(&format!("{}/", server.uri()), config, None)
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(result.statistics.pages_visited, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("run deadline exceeded"));
}

#[tokio::test]
async fn test_nothing_admitted_after_deadline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/a">A</a><a href="/b">B</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page("<p>a</p>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page("<p>b</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(1);
    config.crawler.max_concurrent_pages_open = 1;
    config.crawler.run_deadline_secs = Some(1);

    // Holding the driver on /a pushes the next admission past the deadline
    let fetched = Arc::new(Mutex::new(Vec::new()));
    let sink_fetched = Arc::clone(&fetched);
    let sink: ProgressSink = Arc::new(move |event: ProgressEvent| {
        if let ProgressEvent::Fetching { url, .. } = event {
            if url.ends_with("/a") {
                std::thread::sleep(Duration::from_millis(1200));
            }
            sink_fetched.lock().unwrap().push(url);
        }
    });

    let result = run_with_config(&format!("{}/", server.uri()), config, Some(sink))
        .await
        .unwrap();

    let fetched = fetched.lock().unwrap();
    assert!(!fetched.iter().any(|url| url.ends_with("/b")), "admitted: {:?}", fetched);
    assert_eq!(result.statistics.pages_visited, 2);
    assert!(!strings(&result.all_links).is_empty());
}

#[tokio::test]
async fn test_invalid_seed_is_fatal() {
    let result = run("mailto:someone@example.com", 1, None).await;
    assert!(matches!(result, Err(HarvestError::InvalidSeed(_))));

    let result = run("not a url", 1, None).await;
    assert!(matches!(result, Err(HarvestError::InvalidSeed(_))));
}

#[tokio::test]
async fn test_invalid_config_is_fatal() {
    let mut config = test_config(1);
    config.crawler.max_concurrent_pages_open = 0;

    let result = run_with_config("https://example.com/", config, None).await;
    assert!(matches!(result, Err(HarvestError::Config(_))));
}
