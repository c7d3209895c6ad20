//! The set of URLs admitted for fetching
//!
//! Admission is the only synchronization point the traversal needs for
//! correctness: a URL is inserted before its fetch begins, and only the
//! caller that inserted it may fetch it.

use crate::state::PageState;
use crate::HarvestError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct VisitedInner {
    pages: HashMap<String, PageState>,
    max_depth_reached: u32,
}

/// Concurrency-safe visited set with per-URL state tracking
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<VisitedInner>,
}

impl VisitedSet {
    /// Creates an empty visited set
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VisitedInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically claims `url` for fetching
    ///
    /// Returns true only to the single caller that performed the insertion;
    /// every later call for the same URL returns false, whatever its depth.
    ///
    /// # Arguments
    ///
    /// * `url` - The canonical URL about to be fetched
    /// * `depth` - Depth at which the claim is made (tracked for statistics)
    pub fn try_mark_visited(&self, url: &str, depth: u32) -> bool {
        let mut inner = self.lock();

        if inner.pages.contains_key(url) {
            return false;
        }

        inner.pages.insert(url.to_string(), PageState::Visiting);
        inner.max_depth_reached = inner.max_depth_reached.max(depth);
        true
    }

    /// Moves an admitted URL into a terminal state
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The transition was applied
    /// * `Err(HarvestError::InvalidTransition)` - The URL was never admitted
    ///   or is already terminal
    pub fn finish(&self, url: &str, succeeded: bool) -> Result<(), HarvestError> {
        let next = if succeeded {
            PageState::VisitedOk
        } else {
            PageState::VisitedError
        };

        let mut inner = self.lock();
        let current = inner
            .pages
            .get(url)
            .copied()
            .unwrap_or(PageState::Unvisited);

        if !current.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                url: url.to_string(),
                from: current,
                to: next,
            });
        }

        inner.pages.insert(url.to_string(), next);
        Ok(())
    }

    /// Returns the current state of `url`
    pub fn state(&self, url: &str) -> PageState {
        self.lock()
            .pages
            .get(url)
            .copied()
            .unwrap_or(PageState::Unvisited)
    }

    /// Returns true if `url` has been admitted
    pub fn contains(&self, url: &str) -> bool {
        self.lock().pages.contains_key(url)
    }

    /// Number of admitted URLs
    pub fn len(&self) -> usize {
        self.lock().pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deepest depth at which any URL was admitted
    pub fn max_depth_reached(&self) -> u32 {
        self.lock().max_depth_reached
    }
}
