//! Crawler module for page fetching and traversal
//!
//! This module contains the core traversal logic, including:
//! - HTTP fetching with status and content validation
//! - HTML parsing and link reference extraction
//! - Worklist scheduling with a concurrency cap
//! - Overall traversal coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{
    register_page_links, run, run_with_config, Coordinator, ProgressEvent, ProgressSink,
};
pub use fetcher::{
    build_http_client, fetch_page, is_html_content_type, probe_url, FetchError, FetchedPage,
};
pub use parser::{extract_links, parse_html, ElementKind, ParsedPage, RawLink};
pub use scheduler::{QueuedUrl, ScheduledFetch, Scheduler};
