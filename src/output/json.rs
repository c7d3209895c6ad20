//! JSON report files
//!
//! Writes `summary.json` with the whole report plus one
//! `<category>.json` per non-empty category.

use crate::output::traits::{OutputHandler, OutputResult};
use crate::output::ScrapingResult;
use crate::url::LinkCategory;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the full report
pub const SUMMARY_FILE: &str = "summary.json";

/// Writes the report as pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl OutputHandler for JsonOutput {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write(&self, result: &ScrapingResult, session_dir: &Path) -> OutputResult<Vec<PathBuf>> {
        let mut written = Vec::new();

        let summary_path = session_dir.join(SUMMARY_FILE);
        write_pretty(&summary_path, result)?;
        written.push(summary_path);

        for category in LinkCategory::all() {
            let links = result.links_in(category);
            if links.is_empty() {
                continue;
            }

            let path = session_dir.join(format!("{}.json", category.as_str()));
            write_pretty(&path, &links)?;
            written.push(path);
        }

        tracing::debug!("Wrote {} JSON files to {}", written.len(), session_dir.display());
        Ok(written)
    }
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> OutputResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
