//! Output module for building and persisting run reports
//!
//! This module handles:
//! - Building the run report from the shared traversal state
//! - Writing JSON and markdown files into a per-run session directory
//! - Rendering statistics for the console

mod json;
mod markdown;
mod report;
pub mod stats;
mod traits;

pub use json::{JsonOutput, SUMMARY_FILE};
pub use markdown::{format_markdown_summary, generate_markdown_summary, MarkdownOutput, MARKDOWN_FILE};
pub use report::{build_result, ScrapingResult, ScrapingStats};
pub use stats::{format_detailed_stats, print_detailed_stats};
pub use traits::{OutputError, OutputHandler, OutputResult};

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Creates the output directory if needed
///
/// Called before traversal starts; a failure here is a setup error.
pub fn prepare_output_dir(dir: &Path) -> OutputResult<()> {
    fs::create_dir_all(dir)?;

    if !dir.is_dir() {
        return Err(OutputError::Write(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    Ok(())
}

/// Name of the session directory for a report
///
/// Format: `<host with dots as underscores>_<YYYYmmdd_HHMMSS>`
pub fn session_dir_name(result: &ScrapingResult) -> String {
    let host = Url::parse(&result.base_url)
        .ok()
        .and_then(|url| {
            url.host_str().map(|host| match url.port() {
                Some(port) => format!("{}_{}", host, port),
                None => host.to_string(),
            })
        })
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "{}_{}",
        host.replace(['.', ':'], "_"),
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

/// Writes a report with every configured handler
///
/// # Arguments
///
/// * `result` - The run report
/// * `output_dir` - Parent directory for the session directory
/// * `write_markdown` - Also write `summary.md`
///
/// # Returns
///
/// The session directory the files were written to
pub fn save_results(
    result: &ScrapingResult,
    output_dir: &Path,
    write_markdown: bool,
) -> OutputResult<PathBuf> {
    let session_dir = output_dir.join(session_dir_name(result));
    fs::create_dir_all(&session_dir)?;

    let mut handlers: Vec<Box<dyn OutputHandler>> = vec![Box::new(JsonOutput::new())];
    if write_markdown {
        handlers.push(Box::new(MarkdownOutput::new()));
    }

    for handler in &handlers {
        let written = handler.write(result, &session_dir)?;
        tracing::debug!("{} output: {} files", handler.name(), written.len());
    }

    Ok(session_dir)
}
