//! Crawler coordinator - main traversal orchestration logic
//!
//! This module contains the traversal loop that coordinates all aspects of
//! a run, including:
//! - Admitting worklist items (depth bound, then visited claim)
//! - Fanning fetches out over a bounded set of tasks
//! - Registering discovered links and collecting recursion candidates
//! - Enforcing the optional run deadline
//! - Building the final report

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchError};
use crate::crawler::parser::parse_html;
use crate::crawler::scheduler::{QueuedUrl, Scheduler};
use crate::output::{build_result, ScrapingResult};
use crate::state::{LinkRegistry, PageState, VisitedSet};
use crate::url::{
    canonicalize_against, classify, extract_domain, is_internal_url, parse_seed, CanonicalUrl,
    LinkCategory,
};
use crate::{HarvestError, UrlError};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Events reported to an optional progress observer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A fetch is about to be issued
    Fetching { depth: u32, url: String },

    /// Final size of a non-empty category, emitted once traversal ends
    CategoryTotal { category: LinkCategory, count: usize },
}

/// Observer invoked outside every lock
pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Result of one page task, handed back to the driver
struct PageOutcome {
    queued: QueuedUrl,
    result: Result<Vec<CanonicalUrl>, FetchError>,
}

/// Main traversal coordinator
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    seed: CanonicalUrl,
    registry: Arc<LinkRegistry>,
    visited: Arc<VisitedSet>,
    scheduler: Scheduler,
    progress: Option<ProgressSink>,
}

impl Coordinator {
    /// Creates a coordinator for one run
    ///
    /// # Arguments
    ///
    /// * `seed` - The starting URL (http or https, with a host)
    /// * `config` - The run configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - Invalid seed or the HTTP client could not be built
    pub fn new(seed: &str, config: Config) -> Result<Self, HarvestError> {
        let seed_url = parse_seed(seed)?;
        let seed_host = extract_domain(&seed_url).ok_or(UrlError::MissingHost)?;
        let seed = canonicalize_against(seed_url.as_str(), &seed_url)
            .ok_or_else(|| UrlError::Parse(format!("cannot canonicalize {}", seed_url)))?;

        let client = build_http_client(&config)?;
        let scheduler = Scheduler::new(
            config.crawler.max_concurrent_pages_open as usize,
            vec![QueuedUrl::new(seed.clone(), 0)],
        );

        Ok(Self {
            config: Arc::new(config),
            client,
            seed,
            registry: Arc::new(LinkRegistry::new(seed_host)),
            visited: Arc::new(VisitedSet::new()),
            scheduler,
            progress: None,
        })
    }

    /// Replaces the HTTP client, e.g. to share one already used for probing
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Attaches a progress observer
    pub fn with_progress(mut self, progress: ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    /// The canonical form of the seed
    pub fn seed(&self) -> &CanonicalUrl {
        &self.seed
    }

    /// Runs the traversal to completion and builds the report
    ///
    /// Per-page failures are recorded in the report's error log; the run
    /// itself cannot fail once the coordinator exists.
    ///
    /// # Loop
    ///
    /// 1. Pop worklist items while concurrency slots are free
    /// 2. Admit each one: reject if `depth > max_depth`, then claim it in the
    ///    visited set
    /// 3. Spawn a fetch task per admitted URL
    /// 4. On each completion, settle the page state and enqueue the page's
    ///    candidates at `depth + 1` when `depth < max_depth`
    /// 5. Stop when the worklist is empty and no task is in flight, or when
    ///    the deadline passes
    pub async fn run(mut self) -> ScrapingResult {
        let started_at = Instant::now();
        let max_depth = self.config.crawler.max_depth;
        let deadline = self
            .config
            .crawler
            .run_deadline()
            .map(|limit| tokio::time::Instant::now() + limit);

        tracing::info!(
            "Starting harvest of {} (max depth {}, {} concurrent fetches)",
            self.seed,
            max_depth,
            self.scheduler.max_concurrent()
        );

        let mut tasks: JoinSet<PageOutcome> = JoinSet::new();
        let mut in_flight: HashSet<CanonicalUrl> = HashSet::new();

        loop {
            // A completion observed after the deadline must not admit more work
            if deadline.is_some_and(|deadline| tokio::time::Instant::now() >= deadline) {
                self.abandon(&mut tasks, &in_flight);
                break;
            }

            while let Some(scheduled) = self.scheduler.try_next_url() {
                let queued = scheduled.url;
                if !self.admit(&queued) {
                    continue;
                }

                self.notify(ProgressEvent::Fetching {
                    depth: queued.depth,
                    url: queued.url.to_string(),
                });
                in_flight.insert(queued.url.clone());

                let client = self.client.clone();
                let registry = Arc::clone(&self.registry);
                let permit = scheduled.permit;
                tasks.spawn(async move {
                    let outcome = visit_page(&client, &registry, queued).await;
                    drop(permit);
                    outcome
                });
            }

            // Every slot is free once the task set is empty, so the worklist
            // was drained above
            if tasks.is_empty() {
                break;
            }

            let joined = match deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        self.abandon(&mut tasks, &in_flight);
                        break;
                    }
                },
                None => tasks.join_next().await,
            };

            match joined {
                Some(Ok(outcome)) => {
                    in_flight.remove(&outcome.queued.url);
                    self.complete(outcome, max_depth);
                }
                Some(Err(e)) => {
                    tracing::error!("Page task failed: {}", e);
                }
                None => {}
            }
        }

        // Tasks that panicked never reported back
        for url in in_flight.drain() {
            if self.visited.state(url.as_str()) == PageState::Visiting {
                self.registry
                    .record_error(format!("Error on {}: page task failed", url));
                self.settle(&url, false);
            }
        }

        let result = build_result(&self.registry, &self.visited, self.seed.as_str(), started_at);

        for category in LinkCategory::all() {
            let count = result.category_count(category);
            if count > 0 {
                self.notify(ProgressEvent::CategoryTotal { category, count });
            }
        }

        tracing::info!(
            "Harvest complete: {} pages visited, {} links, {} errors in {}",
            result.statistics.pages_visited,
            result.statistics.total_links,
            result.statistics.errors_count,
            result.statistics.execution_time
        );

        result
    }

    /// Depth check first, then the visited claim
    fn admit(&self, queued: &QueuedUrl) -> bool {
        if queued.depth > self.config.crawler.max_depth {
            tracing::trace!("Depth budget exhausted for {}", queued.url);
            return false;
        }

        if !self.visited.try_mark_visited(queued.url.as_str(), queued.depth) {
            tracing::trace!("Already claimed: {}", queued.url);
            return false;
        }

        true
    }

    fn complete(&mut self, outcome: PageOutcome, max_depth: u32) {
        let PageOutcome { queued, result } = outcome;

        match result {
            Ok(candidates) => {
                self.settle(&queued.url, true);
                if queued.depth < max_depth {
                    self.scheduler
                        .extend_frontier(candidates, queued.depth + 1);
                }
            }
            Err(e) => {
                tracing::warn!("Error on {}: {}", queued.url, e);
                self.registry
                    .record_error(format!("Error on {}: {}", queued.url, e));
                self.settle(&queued.url, false);
            }
        }
    }

    /// Stops the run at the deadline
    fn abandon(&mut self, tasks: &mut JoinSet<PageOutcome>, in_flight: &HashSet<CanonicalUrl>) {
        tasks.abort_all();

        let skipped = self.scheduler.drain_frontier().len();
        tracing::warn!(
            "Run deadline exceeded: abandoning {} in-flight fetches, {} queued URLs never admitted",
            in_flight.len(),
            skipped
        );

        let mut abandoned: Vec<&CanonicalUrl> = in_flight.iter().collect();
        abandoned.sort();
        for url in abandoned {
            self.registry.record_error(format!(
                "Error on {}: run deadline exceeded before fetch completed",
                url
            ));
            self.settle(url, false);
        }
    }

    fn settle(&self, url: &CanonicalUrl, succeeded: bool) {
        if let Err(e) = self.visited.finish(url.as_str(), succeeded) {
            tracing::error!("{}", e);
        }
    }

    fn notify(&self, event: ProgressEvent) {
        if let Some(progress) = &self.progress {
            progress(event);
        }
    }
}

/// Fetches one admitted page and registers everything it references
async fn visit_page(client: &Client, registry: &LinkRegistry, queued: QueuedUrl) -> PageOutcome {
    let result = match fetch_page(client, queued.url.as_str()).await {
        Ok(page) => {
            tracing::info!("[Depth {}] Fetched {}", queued.depth, queued.url);
            if page.final_url != queued.url.as_str() {
                tracing::debug!("{} redirected to {}", queued.url, page.final_url);
            }
            Ok(register_page_links(registry, &queued.url, &page.body))
        }
        Err(e) => Err(e),
    };

    PageOutcome { queued, result }
}

/// Canonicalizes, classifies and registers every reference in `body`
///
/// Returns the recursion candidates: navigation references that classify as
/// pages on the seed's site, deduplicated, in extraction order.
pub fn register_page_links(
    registry: &LinkRegistry,
    page_url: &CanonicalUrl,
    body: &str,
) -> Vec<CanonicalUrl> {
    let Some(base) = page_url.to_url() else {
        return Vec::new();
    };

    let parsed = parse_html(body);
    let mut candidates = Vec::new();
    let mut added = 0usize;

    for raw in &parsed.links {
        let Some(url) = canonicalize_against(&raw.href, &base) else {
            tracing::trace!("Dropped href {:?} on {}", raw.href, page_url);
            continue;
        };

        let (category, file_type) = classify(&url);
        if registry.register_link(&url, category, &file_type) {
            added += 1;
        }

        if raw.kind.is_navigation()
            && category == LinkCategory::Page
            && is_candidate_host(&url, registry.seed_host())
            && !candidates.contains(&url)
        {
            candidates.push(url);
        }
    }

    tracing::debug!(
        "{}: {} references, {} new links, {} candidates{}",
        page_url,
        parsed.links.len(),
        added,
        candidates.len(),
        parsed
            .title
            .as_deref()
            .map(|t| format!(" ({})", t))
            .unwrap_or_default()
    );

    candidates
}

/// Internal membership for recursion: only fetchable schemes qualify
fn is_candidate_host(url: &CanonicalUrl, seed_host: &str) -> bool {
    match Url::parse(url.as_str()) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && is_internal_url(&parsed, seed_host)
        }
        Err(_) => false,
    }
}

/// Runs a traversal from `seed` with the given configuration
///
/// # Arguments
///
/// * `seed` - The starting URL
/// * `config` - Run configuration; validated before use
/// * `progress` - Optional progress observer
///
/// # Returns
///
/// * `Ok(ScrapingResult)` - The run completed (possibly with recorded page errors)
/// * `Err(HarvestError)` - Setup failed before traversal started
///
/// # Example
///
/// ```no_run
/// use link_harvest::config::Config;
/// use link_harvest::run_with_config;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let result = run_with_config("https://example.com/", Config::default(), None).await?;
/// println!("{} links found", result.total_links);
/// # Ok(())
/// # }
/// ```
pub async fn run_with_config(
    seed: &str,
    config: Config,
    progress: Option<ProgressSink>,
) -> Result<ScrapingResult, HarvestError> {
    crate::config::validate(&config)?;

    let mut coordinator = Coordinator::new(seed, config)?;
    if let Some(progress) = progress {
        coordinator = coordinator.with_progress(progress);
    }

    Ok(coordinator.run().await)
}

/// Runs a traversal from `seed` down to `max_depth` with default settings
pub async fn run(
    seed: &str,
    max_depth: u32,
    progress: Option<ProgressSink>,
) -> Result<ScrapingResult, HarvestError> {
    run_with_config(seed, Config::with_max_depth(max_depth), progress).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url(s: &str) -> CanonicalUrl {
        crate::url::canonicalize(s, s).unwrap()
    }

    #[test]
    fn test_coordinator_rejects_bad_seed() {
        assert!(matches!(
            Coordinator::new("ftp://example.com/", Config::default()),
            Err(HarvestError::InvalidSeed(_))
        ));
        assert!(Coordinator::new("not a url", Config::default()).is_err());
    }

    #[test]
    fn test_coordinator_canonicalizes_seed() {
        let coordinator =
            Coordinator::new("https://example.com/start?utm_source=x#top", Config::default())
                .unwrap();
        assert_eq!(coordinator.seed().as_str(), "https://example.com/start");
    }

    #[test]
    fn test_register_page_links_candidates() {
        let registry = LinkRegistry::new("example.com");
        let base = page_url("https://example.com/docs/");
        let body = r#"
            <html><head>
                <link rel="canonical" href="https://www.example.com/docs/">
                <link rel="stylesheet" href="/site.css">
            </head><body>
                <a href="intro">Intro</a>
                <a href="intro#part-2">Intro again</a>
                <a href="/manual.pdf">Manual</a>
                <a href="https://other.org/">Elsewhere</a>
                <a href="mailto:team@example.com">Mail</a>
                <img src="/logo.png">
                <iframe src="/embed/player"></iframe>
            </body></html>
        "#;

        let candidates = register_page_links(&registry, &base, body);
        let candidates: Vec<&str> = candidates.iter().map(|c| c.as_str()).collect();

        assert_eq!(
            candidates,
            vec![
                "https://example.com/docs/intro",
                "https://www.example.com/docs/",
            ]
        );

        let snapshot = registry.snapshot();
        // intro, manual.pdf, other.org, canonical, site.css, logo.png, embed/player
        assert_eq!(snapshot.all_links.len(), 7);
        assert_eq!(snapshot.external_links.len(), 1);
    }

    #[test]
    fn test_register_page_links_opaque_base() {
        let registry = LinkRegistry::new("example.com");
        let urn = page_url("urn:isbn:0451450523");
        assert!(register_page_links(&registry, &urn, "<a href='/x'>x</a>").is_empty());
    }

    #[test]
    fn test_candidate_requires_fetchable_scheme() {
        let url = page_url("https://example.com/a");
        assert!(is_candidate_host(&url, "example.com"));

        let url = page_url("urn:example:thing");
        assert!(!is_candidate_host(&url, "example.com"));
    }
}
