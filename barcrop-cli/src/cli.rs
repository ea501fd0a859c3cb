// barcrop-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use barcrop_core::config::{
    DEFAULT_AUDIO_CODEC, DEFAULT_DARK_THRESHOLD, DEFAULT_SAMPLE_TIME_SECS, DEFAULT_VIDEO_CODEC,
    DEFAULT_VIDEO_EXTENSION,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Barcrop: strip vertical black borders from videos",
    long_about = "Samples one frame of every video in a directory, detects black borders on the left and right edges, and writes a cropped copy (or an unchanged copy when there is nothing to crop) using ffmpeg."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copies or crops every video of an input directory into an output directory
    Crop(CropArgs),
    /// Prints the detected borders of every video without writing anything
    Detect(DetectArgs),
}

/// Options shared by every command that runs border detection.
#[derive(Args, Debug, Clone)]
pub struct DetectionOptions {
    /// Extension of the videos to process, without the dot
    #[arg(long, value_name = "EXT", default_value = DEFAULT_VIDEO_EXTENSION)]
    pub extension: String,

    /// Columns with a mean luminance below this value (0-255) are border
    #[arg(long, value_name = "LUMA", default_value_t = DEFAULT_DARK_THRESHOLD)]
    pub threshold: f64,

    /// Preferred timestamp of the sampled frame, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_SAMPLE_TIME_SECS)]
    pub sample_time: f64,
}

#[derive(Parser, Debug)]
pub struct CropArgs {
    /// Directory containing the videos to process
    #[arg(short = 'i', long = "input", env = "BARCROP_INPUT_DIR", value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory where copied and cropped videos are written
    #[arg(short = 'o', long = "output", env = "BARCROP_OUTPUT_DIR", value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub detection: DetectionOptions,

    /// Video codec used for cropped output
    #[arg(long, value_name = "CODEC", default_value = DEFAULT_VIDEO_CODEC)]
    pub video_codec: String,

    /// Audio codec used for cropped output
    #[arg(long, value_name = "CODEC", default_value = DEFAULT_AUDIO_CODEC)]
    pub audio_codec: String,

    /// Optional: Directory for temporary audio sidecars (defaults to OUTPUT_DIR)
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Optional: Directory for a timestamped log file of the run
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Optional: Write a JSON summary of the batch to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// Directory containing the videos to inspect
    #[arg(short = 'i', long = "input", env = "BARCROP_INPUT_DIR", value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    #[command(flatten)]
    pub detection: DetectionOptions,
}
