//! Report building
//!
//! Turns the shared traversal state into the serializable run report.

use crate::state::{ClassifiedLink, LinkRegistry, VisitedSet};
use crate::url::{CanonicalUrl, LinkCategory};
use chrono::Local;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

/// Run statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapingStats {
    pub pages_visited: usize,
    pub total_links: usize,
    pub internal_count: usize,
    pub external_count: usize,
    pub errors_count: usize,
    /// Human readable elapsed time, e.g. `1.53s`
    pub execution_time: String,
    pub execution_time_ms: u64,
    /// Deepest depth at which a URL was admitted
    pub max_depth_reached: u32,
}

/// The aggregated outcome of one run
#[derive(Debug, Clone, Serialize)]
pub struct ScrapingResult {
    pub base_url: String,
    pub total_links: usize,
    pub internal_links: Vec<CanonicalUrl>,
    pub external_links: Vec<CanonicalUrl>,
    pub all_links: Vec<CanonicalUrl>,
    pub classified_links: BTreeMap<LinkCategory, Vec<ClassifiedLink>>,
    pub category_summary: BTreeMap<LinkCategory, usize>,
    pub errors: Vec<String>,
    pub statistics: ScrapingStats,
    /// Local time the report was built, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
}

impl ScrapingResult {
    /// Number of links in a category
    pub fn category_count(&self, category: LinkCategory) -> usize {
        self.category_summary.get(&category).copied().unwrap_or(0)
    }

    /// Links in a category, in registration order
    pub fn links_in(&self, category: LinkCategory) -> &[ClassifiedLink] {
        self.classified_links
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Checks that the master list, the partition and the buckets agree
    pub fn is_consistent(&self) -> bool {
        let bucket_total: usize = self.category_summary.values().sum();
        self.total_links == self.all_links.len()
            && self.all_links.len() == self.internal_links.len() + self.external_links.len()
            && self.all_links.len() == bucket_total
    }
}

/// Builds the run report from the shared state
///
/// Counts are lengths of one registry snapshot, so the partition and the
/// buckets always add up to the master list.
///
/// # Arguments
///
/// * `registry` - Links and errors discovered by the run
/// * `visited` - Every URL admitted for fetching
/// * `seed` - The seed URL as reported in `base_url`
/// * `started_at` - When the run began
pub fn build_result(
    registry: &LinkRegistry,
    visited: &VisitedSet,
    seed: &str,
    started_at: Instant,
) -> ScrapingResult {
    let snapshot = registry.snapshot();
    let elapsed = started_at.elapsed();

    let category_summary = snapshot
        .classified_links
        .iter()
        .map(|(category, links)| (*category, links.len()))
        .collect();

    let statistics = ScrapingStats {
        pages_visited: visited.len(),
        total_links: snapshot.all_links.len(),
        internal_count: snapshot.internal_links.len(),
        external_count: snapshot.external_links.len(),
        errors_count: snapshot.errors.len(),
        execution_time: format!("{:.2?}", elapsed),
        execution_time_ms: elapsed.as_millis() as u64,
        max_depth_reached: visited.max_depth_reached(),
    };

    ScrapingResult {
        base_url: seed.to_string(),
        total_links: snapshot.all_links.len(),
        internal_links: snapshot.internal_links,
        external_links: snapshot.external_links,
        all_links: snapshot.all_links,
        classified_links: snapshot.classified_links,
        category_summary,
        errors: snapshot.errors.iter().map(ToString::to_string).collect(),
        statistics,
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}
