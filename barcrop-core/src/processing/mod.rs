//! Border detection and batch processing.
//!
//! The detection heuristic lives in `border_detection` and works on the
//! decoded `frame`; `video` runs it over a batch of files and decides between
//! copying and cropping each one.

/// Batch orchestration: probe, detect, copy or crop
pub mod video;

/// Decoded RGB frames and their column luminance
pub mod frame;

/// Left/right border detection and crop geometry
pub mod border_detection;

/// Video property values reported by ffprobe
pub mod video_properties;

/// Serialisable batch summaries
pub mod reporting;

pub use border_detection::{CropRegion, CropSpec, DetectedBorders, detect_borders, detect_video_borders};
pub use frame::Frame;
pub use reporting::{BatchSummary, save_batch_summary_json};
pub use video::{
    BatchPlan, BatchResult, DetectionReport, FailureStage, FileReport, FileStatus, detect_only,
    prepare_batch, process_videos, run,
};
pub use video_properties::VideoProperties;
