//! Link registry and error log
//!
//! The registry keeps three views of the discovered links (master sequence,
//! internal/external partition, category buckets) behind a single lock so
//! they are always projections of the same set.

use crate::url::{is_internal, CanonicalUrl, LinkCategory};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A discovered link with its classification
///
/// Created once, the first time a URL is registered, and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedLink {
    pub url: CanonicalUrl,
    pub category: LinkCategory,
    pub file_type: String,
}

/// A timestamped failure description
#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

#[derive(Debug, Default)]
struct LinkViews {
    index: HashSet<CanonicalUrl>,
    all: Vec<CanonicalUrl>,
    internal: Vec<CanonicalUrl>,
    external: Vec<CanonicalUrl>,
    by_category: BTreeMap<LinkCategory, Vec<ClassifiedLink>>,
}

/// Point-in-time copy of the registry
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    pub all_links: Vec<CanonicalUrl>,
    pub internal_links: Vec<CanonicalUrl>,
    pub external_links: Vec<CanonicalUrl>,
    /// Every category is present, possibly with an empty bucket
    pub classified_links: BTreeMap<LinkCategory, Vec<ClassifiedLink>>,
    pub errors: Vec<ErrorEntry>,
}

/// Concurrency-safe accumulator for discovered links and errors
#[derive(Debug)]
pub struct LinkRegistry {
    seed_host: String,
    links: Mutex<LinkViews>,
    errors: Mutex<Vec<ErrorEntry>>,
}

impl LinkRegistry {
    /// Creates an empty registry for a run rooted at `seed_host`
    pub fn new(seed_host: impl Into<String>) -> Self {
        let by_category = LinkCategory::all()
            .into_iter()
            .map(|category| (category, Vec::new()))
            .collect();

        Self {
            seed_host: seed_host.into(),
            links: Mutex::new(LinkViews {
                by_category,
                ..LinkViews::default()
            }),
            errors: Mutex::new(Vec::new()),
        }
    }

    fn lock_links(&self) -> MutexGuard<'_, LinkViews> {
        self.links.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_errors(&self) -> MutexGuard<'_, Vec<ErrorEntry>> {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Host the internal/external partition is computed against
    pub fn seed_host(&self) -> &str {
        &self.seed_host
    }

    /// Registers a link if it is not already known
    ///
    /// # Returns
    ///
    /// * `true` - The link was new and has been appended to every view
    /// * `false` - The link was already registered; nothing changed
    pub fn register_link(&self, url: &CanonicalUrl, category: LinkCategory, file_type: &str) -> bool {
        let internal = is_internal(url, &self.seed_host);

        let mut views = self.lock_links();
        if !views.index.insert(url.clone()) {
            return false;
        }

        views.all.push(url.clone());
        if internal {
            views.internal.push(url.clone());
        } else {
            views.external.push(url.clone());
        }
        views
            .by_category
            .entry(category)
            .or_default()
            .push(ClassifiedLink {
                url: url.clone(),
                category,
                file_type: file_type.to_string(),
            });

        true
    }

    /// Appends a timestamped entry to the error log
    pub fn record_error(&self, message: impl Into<String>) {
        let entry = ErrorEntry {
            timestamp: Local::now(),
            message: message.into(),
        };
        self.lock_errors().push(entry);
    }

    /// Returns true if `url` has been registered
    pub fn contains(&self, url: &CanonicalUrl) -> bool {
        self.lock_links().index.contains(url)
    }

    /// Number of distinct registered links
    pub fn len(&self) -> usize {
        self.lock_links().all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of recorded errors
    pub fn error_count(&self) -> usize {
        self.lock_errors().len()
    }

    /// Takes a consistent copy of all registry state
    ///
    /// The link lock is held across the copy of all three views, then the
    /// error lock is taken. Writers never hold both.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let views = self.lock_links();
        let errors = self.lock_errors();

        RegistrySnapshot {
            all_links: views.all.clone(),
            internal_links: views.internal.clone(),
            external_links: views.external.clone(),
            classified_links: views.by_category.clone(),
            errors: errors.clone(),
        }
    }
}
