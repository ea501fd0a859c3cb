//! Core library for removing black vertical borders from videos using ffmpeg
//! and ffprobe.
//!
//! One frame per video is sampled and scanned from both horizontal edges for
//! dark columns. Videos without borders are copied unchanged; the others are
//! cropped and re-encoded into the output directory.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use barcrop_core::{CoreConfig, FfmpegToolkit, run};
//! use std::path::PathBuf;
//!
//! let mut config = CoreConfig::new(
//!     PathBuf::from("/path/to/input"),
//!     PathBuf::from("/path/to/output"),
//! );
//! config.dark_threshold = 20.0;
//! config.validate().unwrap();
//!
//! let result = run(&FfmpegToolkit::new(), &config).unwrap();
//! println!("Completed: {}/{}", result.succeeded(), result.total());
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod processing;
pub mod temp_files;
pub mod terminal;
pub mod utils;

// Re-exports for public API
pub use config::{Codecs, CoreConfig, CoreConfigBuilder};
pub use discovery::find_processable_files;
pub use error::{CoreError, CoreResult};
pub use external::{
    CropEncodeParams, FfmpegToolkit, VideoToolkit, check_dependencies, check_dependency,
};
pub use processing::{
    BatchPlan, BatchResult, BatchSummary, CropRegion, CropSpec, DetectedBorders, DetectionReport,
    FailureStage, FileReport, FileStatus, Frame, VideoProperties, detect_borders, detect_only,
    detect_video_borders, prepare_batch, process_videos, run, save_batch_summary_json,
};
pub use temp_files::{create_temp_dir, create_temp_file_path};
pub use utils::{format_bytes, format_duration, parse_ffmpeg_time};
