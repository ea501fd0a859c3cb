//! Implementation of the 'crop' subcommand.
//!
//! Validates the paths, builds the core configuration from the arguments and
//! hands the discovered files to barcrop-core. Per-file failures are part of
//! the summary; only problems with the paths, the configuration or missing
//! ffmpeg/ffprobe binaries make the command fail.

use crate::cli::CropArgs;
use crate::commands::resolve_input_dir;
use crate::error::{CliErrorContext, CliResult};

use barcrop_core::processing::video::BatchResult;
use barcrop_core::{
    BatchSummary, CoreConfig, CoreConfigBuilder, FfmpegToolkit, FileStatus, check_dependencies,
    format_duration, prepare_batch, process_videos, save_batch_summary_json, terminal,
};

use log::{debug, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Creates and validates the core configuration from CLI arguments.
pub fn create_core_config(args: &CropArgs, input_dir: PathBuf) -> CliResult<CoreConfig> {
    let mut builder = CoreConfigBuilder::new()
        .input_dir(input_dir)
        .output_dir(args.output_dir.clone())
        .video_extension(&args.detection.extension)
        .dark_threshold(args.detection.threshold)
        .sample_time_secs(args.detection.sample_time)
        .video_codec(&args.video_codec)
        .audio_codec(&args.audio_codec);

    if let Some(temp_dir) = &args.temp_dir {
        builder = builder.temp_dir(temp_dir.clone());
    }

    let config = builder.build();
    config.validate()?;
    Ok(config)
}

fn display_initialization_info(config: &CoreConfig, files: &[PathBuf], log_path: Option<&PathBuf>) {
    terminal::print_section("Initialization");
    terminal::print_status("Input", &config.input_dir.display().to_string(), false);
    terminal::print_status("Output", &config.output_dir.display().to_string(), false);
    terminal::print_status(
        "Threshold",
        &format!("{} (sample at {}s)", config.dark_threshold, config.sample_time_secs),
        false,
    );
    terminal::print_status(
        "Codecs",
        &format!("{} / {}", config.codecs.video, config.codecs.audio),
        false,
    );
    if let Some(path) = log_path {
        terminal::print_status("Log file", &path.display().to_string(), false);
    }
    terminal::print_status(
        "Files",
        &format!("{} .{} file(s)", files.len(), config.video_extension),
        true,
    );
}

fn display_summary(result: &BatchResult, started: Instant) {
    terminal::print_section("Summary");

    for report in &result.reports {
        let outcome = match &report.status {
            FileStatus::Copied => "copied (no borders)".to_string(),
            FileStatus::Cropped { crop, output_width } => format!("cropped {crop}, {output_width}px wide"),
            FileStatus::Failed { stage, .. } => format!("failed ({stage})"),
        };
        terminal::print_status(&report.filename, &outcome, !report.status.is_success());
    }

    terminal::print_status(
        "Completed",
        &format!("{}/{}", result.succeeded(), result.total()),
        true,
    );
    terminal::print_status("Output", &result.output_dir.display().to_string(), false);
    terminal::print_status(
        "Total time",
        &format_duration(started.elapsed().as_secs_f64()),
        false,
    );
}

/// Runs the crop command.
pub fn run_crop(args: CropArgs, log_path: Option<PathBuf>) -> CliResult<()> {
    let started = Instant::now();

    let input_dir = resolve_input_dir(&args.input_dir)?;
    let config = create_core_config(&args, input_dir)?;
    let plan = prepare_batch(&config).cli_with_context(|| {
        format!(
            "Cannot crop '{}' into '{}'",
            config.input_dir.display(),
            config.output_dir.display()
        )
    })?;

    display_initialization_info(&plan.config, &plan.files, log_path.as_ref());

    let result = if plan.files.is_empty() {
        terminal::print_warning(&format!(
            "No .{} files found in {}",
            plan.config.video_extension,
            plan.config.input_dir.display()
        ));
        BatchResult {
            reports: Vec::new(),
            output_dir: plan.config.output_dir.clone(),
        }
    } else {
        check_dependencies()?;
        debug!("ffmpeg and ffprobe found");
        terminal::print_section("Processing");
        process_videos(&FfmpegToolkit::new(), &plan.config, &plan.files)
    };

    display_summary(&result, started);

    if let Some(report_path) = &args.report {
        match save_batch_summary_json(&BatchSummary::from(&result), report_path) {
            Ok(()) => terminal::print_status("Report", &report_path.display().to_string(), false),
            Err(e) => warn!("Failed to write report to {}: {}", report_path.display(), e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DetectionOptions;

    fn args(threshold: f64) -> CropArgs {
        CropArgs {
            input_dir: PathBuf::from("in"),
            output_dir: PathBuf::from("out"),
            detection: DetectionOptions {
                extension: ".MOV".to_string(),
                threshold,
                sample_time: 2.5,
            },
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            temp_dir: Some(PathBuf::from("/tmp/barcrop")),
            log_dir: None,
            report: None,
        }
    }

    #[test]
    fn test_create_core_config() {
        let config = create_core_config(&args(20.0), PathBuf::from("in")).unwrap();
        assert_eq!(config.video_extension, "MOV");
        assert_eq!(config.dark_threshold, 20.0);
        assert_eq!(config.sample_time_secs, 2.5);
        assert_eq!(config.temp_base_dir(), &PathBuf::from("/tmp/barcrop"));
    }

    #[test]
    fn test_create_core_config_rejects_bad_threshold() {
        assert!(create_core_config(&args(300.0), PathBuf::from("in")).is_err());
    }
}
