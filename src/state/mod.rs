//! State module for tracking traversal progress
//!
//! This module owns the only mutable state shared across a run.
//!
//! # Components
//!
//! - `PageState`: Tracks the state of individual pages (unvisited, visiting, visited)
//! - `VisitedSet`: The admission gate guaranteeing at-most-one fetch per URL
//! - `LinkRegistry`: Deduplicated links, their partitions and buckets, and the error log

mod page_state;
mod registry;
mod visited;

// Re-export main types
pub use page_state::PageState;
pub use registry::{ClassifiedLink, ErrorEntry, LinkRegistry, RegistrySnapshot};
pub use visited::VisitedSet;
