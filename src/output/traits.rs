//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! errors they report.

use crate::output::ScrapingResult;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// Each handler renders a finished report into files inside a session
/// directory that already exists.
pub trait OutputHandler {
    /// Short handler name used in log messages
    fn name(&self) -> &'static str;

    /// Writes the report into `session_dir`
    ///
    /// # Returns
    ///
    /// The paths of every file written
    fn write(&self, result: &ScrapingResult, session_dir: &Path) -> OutputResult<Vec<PathBuf>>;
}
