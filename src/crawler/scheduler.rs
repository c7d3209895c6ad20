//! Scheduler for managing the crawl worklist and concurrency limit
//!
//! This module handles:
//! - FIFO worklist of `(url, depth)` items awaiting admission
//! - Global concurrency limiting via a semaphore
//!
//! Admission (depth bound, visited claim) is decided by the coordinator when
//! an item leaves the worklist, not when it enters.

use crate::url::CanonicalUrl;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A URL waiting in the worklist together with its depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL to fetch
    pub url: CanonicalUrl,

    /// Number of hops from the seed
    pub depth: u32,
}

impl QueuedUrl {
    pub fn new(url: CanonicalUrl, depth: u32) -> Self {
        Self { url, depth }
    }
}

/// A worklist item holding one of the concurrency slots
///
/// The slot is released when this value (or the permit moved out of it)
/// is dropped.
pub struct ScheduledFetch {
    /// The URL to fetch
    pub url: QueuedUrl,

    /// The semaphore permit for this fetch
    pub permit: OwnedSemaphorePermit,
}

/// Scheduler manages the worklist and the fetch concurrency cap
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    global_semaphore: Arc<Semaphore>,

    /// Worklist in discovery order
    frontier: VecDeque<QueuedUrl>,

    max_concurrent: usize,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `max_concurrent` - Maximum number of fetches in flight at once
    /// * `initial_frontier` - Initial worklist items
    pub fn new(max_concurrent: usize, initial_frontier: Vec<QueuedUrl>) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            global_semaphore: Arc::new(Semaphore::new(max_concurrent)),
            frontier: VecDeque::from(initial_frontier),
            max_concurrent,
        }
    }

    /// Takes the next worklist item if a concurrency slot is free
    ///
    /// Never waits. Returns `None` when the worklist is empty or every slot is
    /// taken; in the latter case the item stays queued.
    pub fn try_next_url(&mut self) -> Option<ScheduledFetch> {
        if self.frontier.is_empty() {
            return None;
        }

        let permit = self.global_semaphore.clone().try_acquire_owned().ok()?;
        let url = self.frontier.pop_front()?;

        tracing::trace!("Scheduling {} at depth {}", url.url, url.depth);
        Some(ScheduledFetch { url, permit })
    }

    /// Appends several URLs at the same depth, keeping their order
    pub fn extend_frontier<I>(&mut self, urls: I, depth: u32)
    where
        I: IntoIterator<Item = CanonicalUrl>,
    {
        self.frontier
            .extend(urls.into_iter().map(|url| QueuedUrl::new(url, depth)));
    }

    /// Removes and returns every queued item
    pub fn drain_frontier(&mut self) -> Vec<QueuedUrl> {
        self.frontier.drain(..).collect()
    }

    /// Returns the number of URLs in the worklist
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns whether the worklist is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}
