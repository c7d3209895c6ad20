//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a run,
//! including statistics, per-category link tables, and the error log.

use crate::output::traits::{OutputHandler, OutputResult};
use crate::output::ScrapingResult;
use crate::url::LinkCategory;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the markdown summary
pub const MARKDOWN_FILE: &str = "summary.md";

/// Number of links listed per category before truncating
const LINKS_PER_CATEGORY: usize = 25;

/// Writes `summary.md`
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownOutput;

impl MarkdownOutput {
    pub fn new() -> Self {
        Self
    }
}

impl OutputHandler for MarkdownOutput {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn write(&self, result: &ScrapingResult, session_dir: &Path) -> OutputResult<Vec<PathBuf>> {
        let path = session_dir.join(MARKDOWN_FILE);
        generate_markdown_summary(result, &path)?;
        Ok(vec![path])
    }
}

/// Generates a markdown summary of a run
///
/// # Arguments
///
/// * `result` - The run report
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(result: &ScrapingResult, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(result);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run report as markdown
pub fn format_markdown_summary(result: &ScrapingResult) -> String {
    let stats = &result.statistics;
    let mut md = String::new();

    md.push_str("# Link Harvest Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Website**: {}\n", result.base_url));
    md.push_str(&format!("- **Completed**: {}\n", result.timestamp));
    md.push_str(&format!("- **Execution Time**: {}\n\n", stats.execution_time));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Visited**: {}\n", stats.pages_visited));
    md.push_str(&format!("- **Total Links**: {}\n", stats.total_links));
    md.push_str(&format!("- **Internal Links**: {}\n", stats.internal_count));
    md.push_str(&format!("- **External Links**: {}\n", stats.external_count));
    md.push_str(&format!(
        "- **Max Depth Reached**: {}\n",
        stats.max_depth_reached
    ));
    md.push_str(&format!("- **Errors**: {}\n\n", stats.errors_count));

    // Category breakdown
    md.push_str("## Links by Category\n\n");
    md.push_str("| Category | Count |\n");
    md.push_str("|----------|-------|\n");
    for category in LinkCategory::all() {
        md.push_str(&format!(
            "| {} | {} |\n",
            category.label(),
            result.category_count(category)
        ));
    }
    md.push('\n');

    for category in LinkCategory::all() {
        let links = result.links_in(category);
        if links.is_empty() {
            continue;
        }

        md.push_str(&format!("## {} ({})\n\n", category.label(), links.len()));
        md.push_str("| Type | URL |\n");
        md.push_str("|------|-----|\n");
        for link in links.iter().take(LINKS_PER_CATEGORY) {
            md.push_str(&format!("| {} | {} |\n", link.file_type, link.url));
        }
        if links.len() > LINKS_PER_CATEGORY {
            md.push_str(&format!(
                "\n... and {} more\n",
                links.len() - LINKS_PER_CATEGORY
            ));
        }
        md.push('\n');
    }

    // Error log
    if !result.errors.is_empty() {
        md.push_str("## Errors\n\n");
        for error in &result.errors {
            md.push_str(&format!("- {}\n", error));
        }
        md.push('\n');
    }

    md
}
