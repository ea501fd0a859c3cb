//! Implementation of the 'detect' subcommand.
//!
//! Runs border detection on every video of the input directory and prints the
//! margins that `crop` would remove. Nothing is written to disk.

use crate::cli::DetectArgs;
use crate::commands::{discover_files, resolve_input_dir};
use crate::error::CliResult;

use barcrop_core::{CoreConfigBuilder, FfmpegToolkit, check_dependencies, detect_only, terminal};

/// Runs the detect command.
pub fn run_detect(args: DetectArgs) -> CliResult<()> {
    let input_dir = resolve_input_dir(&args.input_dir)?;

    // Detection never writes, so the output directory is only a placeholder
    let config = CoreConfigBuilder::new()
        .output_dir(input_dir.join("cropped"))
        .input_dir(input_dir)
        .video_extension(&args.detection.extension)
        .dark_threshold(args.detection.threshold)
        .sample_time_secs(args.detection.sample_time)
        .build();
    config.validate()?;

    let files = discover_files(&config.input_dir, &config.video_extension)?;
    terminal::print_section("Border detection");

    if files.is_empty() {
        terminal::print_warning(&format!(
            "No .{} files found in {}",
            config.video_extension,
            config.input_dir.display()
        ));
        return Ok(());
    }

    check_dependencies()?;

    let reports = detect_only(&FfmpegToolkit::new(), &config, &files);
    let mut detected = 0;
    for report in &reports {
        match &report.result {
            Ok(crop) if crop.is_empty() => {
                detected += 1;
                terminal::print_status(&report.filename, "no borders", false);
            }
            Ok(crop) => {
                detected += 1;
                terminal::print_status(&report.filename, &crop.to_string(), true);
            }
            Err(e) => {
                terminal::print_status(&report.filename, "detection failed", true);
                terminal::print_sub_item(&e.to_string());
            }
        }
    }

    terminal::print_status(
        "Detected",
        &format!("{}/{}", detected, reports.len()),
        true,
    );
    Ok(())
}
