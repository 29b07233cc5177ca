use anyhow::{Context, Result};
use jiff::Timestamp;
use std::fs;
use std::path::{Path, PathBuf};

use crate::bug::BugRecord;
use crate::config::Config;
use crate::time::utc_stamp;

mod generator;
pub mod render;

pub use generator::ReportGenerator;
pub use render::{render, render_report};

/// A generated report ready to be saved
pub struct Report {
    /// Rendered text report
    pub content: String,
    /// Bugs in report order
    pub records: Vec<BugRecord>,
    /// Instant the bug ages were measured against
    pub timestamp: Timestamp,
    pub estimated_cost: f32,
}

/// Where [`Report::save`] wrote its files
#[derive(Debug)]
pub struct SavedReport {
    pub json_path: PathBuf,
    pub report_path: PathBuf,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Closing line printed after a run
    pub fn completion_line(&self) -> String {
        format!(
            "Completed! Processed {} bugs (as of {})",
            self.records.len(),
            utc_stamp(self.timestamp)
        )
    }

    /// Pretty-printed JSON array of the bug records
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.records).context("Failed to serialize bug records")
    }

    /// Write the JSON dump and the rendered report into the output directory
    pub fn save(&self, config: &Config) -> Result<SavedReport> {
        let output_dir = &config.output.dir;
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

        let json_path = config.json_path();
        write_file(&json_path, &self.to_json()?)?;

        let report_path = config.report_path();
        write_file(&report_path, &self.content)?;

        Ok(SavedReport {
            json_path,
            report_path,
        })
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}
