//! Batch summary reporting.
//!
//! Turns a [`BatchResult`] into a serialisable summary that the CLI can write
//! as JSON next to the cropped videos.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::CoreResult;
use crate::processing::border_detection::CropSpec;
use crate::processing::video::{BatchResult, FailureStage, FileReport, FileStatus};

/// Outcome of a single file as written to the report.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub filename: String,
    pub output_path: PathBuf,
    /// "copied", "cropped" or "failed"
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<FailureStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_secs: f64,
}

impl From<&FileReport> for FileSummary {
    fn from(report: &FileReport) -> Self {
        let (outcome, output_width, failed_stage, error) = match &report.status {
            FileStatus::Copied => ("copied", None, None, None),
            FileStatus::Cropped { output_width, .. } => ("cropped", Some(*output_width), None, None),
            FileStatus::Failed { stage, message } => ("failed", None, Some(*stage), Some(message.clone())),
        };

        Self {
            filename: report.filename.clone(),
            output_path: report.output_path.clone(),
            outcome,
            crop: report.crop,
            output_width,
            failed_stage,
            error,
            elapsed_secs: report.elapsed.as_secs_f64(),
        }
    }
}

/// Summary of a whole batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub output_dir: PathBuf,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub files: Vec<FileSummary>,
}

impl From<&BatchResult> for BatchSummary {
    fn from(result: &BatchResult) -> Self {
        Self {
            output_dir: result.output_dir.clone(),
            total: result.total(),
            succeeded: result.succeeded(),
            failed: result.failed(),
            files: result.reports.iter().map(FileSummary::from).collect(),
        }
    }
}

/// Writes the batch summary as pretty-printed JSON.
pub fn save_batch_summary_json(summary: &BatchSummary, output_path: &Path) -> CoreResult<()> {
    let json = serde_json::to_string_pretty(summary)?;
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output_path, json)?;
    log::debug!("Wrote batch report to {}", output_path.display());
    Ok(())
}
