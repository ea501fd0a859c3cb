//! Vertical black border detection and crop geometry.
//!
//! A single frame is sampled near the start of the video. Columns are scanned
//! from each horizontal edge towards the middle; the first column whose mean
//! luminance reaches the threshold marks the end of the border on that side.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::VideoToolkit;
use crate::processing::frame::Frame;
use crate::processing::video_properties::VideoProperties;

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Pixel columns to strip from the left and right edges of every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CropSpec {
    pub left: u32,
    pub right: u32,
}

impl CropSpec {
    pub fn new(left: u32, right: u32) -> Self {
        Self { left, right }
    }

    /// True when there is nothing to crop on either side.
    pub fn is_empty(&self) -> bool {
        self.left == 0 && self.right == 0
    }
}

impl fmt::Display for CropSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "left={}px, right={}px", self.left, self.right)
    }
}

/// Rectangle kept from each frame: `(x, 0)` to `(x + width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Derives the region for a `source_width` x `source_height` video.
    pub fn from_crop(crop: CropSpec, source_width: u32, source_height: u32) -> CoreResult<Self> {
        let removed = u64::from(crop.left) + u64::from(crop.right);
        if removed >= u64::from(source_width) {
            return Err(CoreError::InvalidCrop(format!(
                "margins {crop} leave no picture in a {source_width}px wide video"
            )));
        }
        if source_height == 0 {
            return Err(CoreError::InvalidCrop("video height is zero".to_string()));
        }

        Ok(Self {
            x: crop.left,
            width: source_width - crop.left - crop.right,
            height: source_height,
        })
    }

    /// ffmpeg `crop` filter expression for this region.
    pub fn to_filter(&self) -> String {
        format!("crop={}:{}:{}:0", self.width, self.height, self.x)
    }
}

/// Computes the crop margins for a decoded frame.
///
/// A column is dark when its mean luminance is below `threshold`. The left
/// scan covers `0..width/2` and the right scan covers `width/2+1..width`,
/// both excluding the midpoint. A side without any non-dark column in its
/// half gets a margin of 0.
pub fn detect_borders(frame: &Frame, threshold: f64) -> CropSpec {
    let columns = frame.column_luminance();
    let width = columns.len();
    if width == 0 {
        return CropSpec::default();
    }

    let mid = width / 2;
    let is_bright = |x: usize| columns[x] >= threshold;

    let left = (0..mid).find(|&x| is_bright(x)).unwrap_or(0);
    let right = ((mid + 1)..width)
        .rev()
        .find(|&x| is_bright(x))
        .map(|x| width - 1 - x)
        .unwrap_or(0);

    CropSpec::new(left as u32, right as u32)
}

/// Timestamp of the sampled frame: the preferred time, pulled back so that it
/// stays `end_guard_secs` away from the end of short clips, never negative.
pub fn sample_time(duration_secs: f64, preferred_secs: f64, end_guard_secs: f64) -> f64 {
    preferred_secs.min(duration_secs - end_guard_secs).max(0.0)
}

/// Margins found on a sampled frame, together with the size of that frame.
///
/// The frame is what ffmpeg actually decodes, after any rotation metadata has
/// been applied, so the crop rectangle is derived from its size rather than
/// from the coded size reported by ffprobe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedBorders {
    pub crop: CropSpec,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl DetectedBorders {
    /// Region to keep from every decoded frame.
    pub fn region(&self) -> CoreResult<CropRegion> {
        CropRegion::from_crop(self.crop, self.frame_width, self.frame_height)
    }
}

/// Samples one frame of `input_path` and detects its borders.
///
/// Decode failures are returned as errors; the caller must not copy or crop
/// the file in that case.
pub fn detect_video_borders<T: VideoToolkit>(
    toolkit: &T,
    input_path: &Path,
    props: &VideoProperties,
    config: &CoreConfig,
) -> CoreResult<DetectedBorders> {
    let at_secs = sample_time(props.duration_secs, config.sample_time_secs, config.end_guard_secs);
    log::debug!(
        "Sampling frame at {:.2}s of {} (duration {:.2}s)",
        at_secs,
        input_path.display(),
        props.duration_secs
    );

    let frame = toolkit.sample_frame(input_path, at_secs)?;
    if frame.width() != props.width || frame.height() != props.height {
        log::warn!(
            "Sampled frame is {}x{} but ffprobe reported {}x{} for {}; cropping the decoded size",
            frame.width(),
            frame.height(),
            props.width,
            props.height,
            input_path.display()
        );
    }

    let crop = detect_borders(&frame, config.dark_threshold);
    log::debug!("Detected borders for {}: {}", input_path.display(), crop);
    Ok(DetectedBorders {
        crop,
        frame_width: frame.width(),
        frame_height: frame.height(),
    })
}
