//! Console statistics
//!
//! Renders a finished report for the terminal: overview, per-category
//! counts, a few sample links per category, then the error log.

use crate::output::ScrapingResult;
use crate::url::LinkCategory;

/// Sample links shown per category
const SAMPLES_PER_CATEGORY: usize = 3;

/// Prints statistics to stdout in a formatted manner
pub fn print_detailed_stats(result: &ScrapingResult) {
    print!("{}", format_detailed_stats(result));
}

/// Formats the console report
pub fn format_detailed_stats(result: &ScrapingResult) -> String {
    let stats = &result.statistics;
    let rule = "=".repeat(50);
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", rule));
    out.push_str("DETAILED STATISTICS\n");
    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!("Website: {}\n", result.base_url));
    out.push_str(&format!("Execution Time: {}\n", stats.execution_time));
    out.push_str(&format!("Pages Visited: {}\n", stats.pages_visited));
    out.push_str(&format!("Total Links: {}\n", stats.total_links));
    out.push_str(&format!("Internal Links: {}\n", stats.internal_count));
    out.push_str(&format!("External Links: {}\n", stats.external_count));
    out.push_str(&format!("Max Depth Reached: {}\n", stats.max_depth_reached));
    out.push_str(&format!("Errors Encountered: {}\n", stats.errors_count));

    let non_empty: Vec<LinkCategory> = LinkCategory::all()
        .into_iter()
        .filter(|c| result.category_count(*c) > 0)
        .collect();

    out.push_str("\nLinks by Category:\n");
    for category in &non_empty {
        out.push_str(&format!(
            "  {}: {}\n",
            category.label(),
            result.category_count(*category)
        ));
    }

    out.push_str("\nSample Links by Category:\n");
    for category in &non_empty {
        let links = result.links_in(*category);
        out.push_str(&format!("\n{} ({} total):\n", category.label(), links.len()));
        for link in links.iter().take(SAMPLES_PER_CATEGORY) {
            out.push_str(&format!("  - [{}] {}\n", link.file_type, link.url));
        }
        if links.len() > SAMPLES_PER_CATEGORY {
            out.push_str(&format!(
                "  ... and {} more\n",
                links.len() - SAMPLES_PER_CATEGORY
            ));
        }
    }

    if !result.errors.is_empty() {
        out.push_str("\nErrors:\n");
        for error in &result.errors {
            out.push_str(&format!("  - {}\n", error));
        }
    }

    out.push_str(&format!("{}\n", rule));
    out
}
