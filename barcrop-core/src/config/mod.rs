//! Configuration structures and constants for the barcrop-core library.
//!
//! This module replaces hard-coded paths and magic numbers with an explicit
//! [`CoreConfig`] that is passed into the batch runner.

mod builder;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub use builder::CoreConfigBuilder;

// Default constants

/// File extension (without the dot) of the videos picked up from the input directory.
pub const DEFAULT_VIDEO_EXTENSION: &str = "mp4";

/// Luminance cutoff on a 0-255 scale. Columns whose mean luminance is below
/// this value are considered part of a border.
pub const DEFAULT_DARK_THRESHOLD: f64 = 15.0;

/// Preferred timestamp (seconds) of the frame sampled for detection.
pub const DEFAULT_SAMPLE_TIME_SECS: f64 = 1.0;

/// Distance (seconds) kept from the end of the stream when sampling short clips.
pub const DEFAULT_END_GUARD_SECS: f64 = 0.1;

/// Output video codec used whenever a video is cropped.
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";

/// Output audio codec used whenever a video is cropped.
pub const DEFAULT_AUDIO_CODEC: &str = "aac";

/// Codec pair used for re-encoding cropped videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codecs {
    pub video: String,
    pub audio: String,
}

impl Default for Codecs {
    fn default() -> Self {
        Self {
            video: DEFAULT_VIDEO_CODEC.to_string(),
            audio: DEFAULT_AUDIO_CODEC.to_string(),
        }
    }
}

/// Main configuration structure for the barcrop-core library.
///
/// Only the two directories are mandatory; everything else falls back to the
/// defaults above.
///
/// # Examples
///
/// ```rust
/// use barcrop_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .input_dir(PathBuf::from("/path/to/videos"))
///     .output_dir(PathBuf::from("/path/to/videos/cropped"))
///     .dark_threshold(20.0)
///     .build();
///
/// assert_eq!(config.video_extension, "mp4");
/// assert_eq!(config.dark_threshold, 20.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Directory scanned (non-recursively) for input videos
    pub input_dir: PathBuf,

    /// Directory receiving copied or cropped videos under their original names
    pub output_dir: PathBuf,

    /// Optional directory for temporary files (defaults to `output_dir`)
    pub temp_dir: Option<PathBuf>,

    /// Extension filter applied during discovery, without the leading dot
    pub video_extension: String,

    /// Luminance below which a column counts as dark
    pub dark_threshold: f64,

    /// Preferred sample timestamp in seconds
    pub sample_time_secs: f64,

    /// Safety distance from the end of the stream in seconds
    pub end_guard_secs: f64,

    /// Codecs used when cropping
    pub codecs: Codecs,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("cropped"),
            temp_dir: None,
            video_extension: DEFAULT_VIDEO_EXTENSION.to_string(),
            dark_threshold: DEFAULT_DARK_THRESHOLD,
            sample_time_secs: DEFAULT_SAMPLE_TIME_SECS,
            end_guard_secs: DEFAULT_END_GUARD_SECS,
            codecs: Codecs::default(),
        }
    }
}

impl CoreConfig {
    /// Creates a configuration for the given directories with default settings.
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            ..Self::default()
        }
    }

    /// Directory under which per-file temporary directories are created.
    pub fn temp_base_dir(&self) -> &PathBuf {
        self.temp_dir.as_ref().unwrap_or(&self.output_dir)
    }

    /// Checks that the configuration values are usable.
    pub fn validate(&self) -> CoreResult<()> {
        if self.video_extension.is_empty() || self.video_extension.starts_with('.') {
            return Err(CoreError::Config(format!(
                "video extension must be non-empty and given without a leading dot, got '{}'",
                self.video_extension
            )));
        }

        if !self.dark_threshold.is_finite() || !(0.0..=255.0).contains(&self.dark_threshold) {
            return Err(CoreError::Config(format!(
                "dark threshold must be within 0-255, got {}",
                self.dark_threshold
            )));
        }

        if !self.sample_time_secs.is_finite() || self.sample_time_secs < 0.0 {
            return Err(CoreError::Config(format!(
                "sample time must be a non-negative number of seconds, got {}",
                self.sample_time_secs
            )));
        }

        if !self.end_guard_secs.is_finite() || self.end_guard_secs < 0.0 {
            return Err(CoreError::Config(format!(
                "end guard must be a non-negative number of seconds, got {}",
                self.end_guard_secs
            )));
        }

        if self.codecs.video.trim().is_empty() || self.codecs.audio.trim().is_empty() {
            return Err(CoreError::Config("codec names must not be empty".to_string()));
        }

        if self.input_dir == self.output_dir {
            return Err(CoreError::Config(format!(
                "output directory must differ from the input directory ({})",
                self.input_dir.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::new(PathBuf::from("in"), PathBuf::from("out"));
        assert_eq!(config.video_extension, DEFAULT_VIDEO_EXTENSION);
        assert_eq!(config.dark_threshold, DEFAULT_DARK_THRESHOLD);
        assert_eq!(config.codecs.video, "libx264");
        assert_eq!(config.codecs.audio, "aac");
        assert_eq!(config.temp_base_dir(), &PathBuf::from("out"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = CoreConfig::new(PathBuf::from("in"), PathBuf::from("out"));

        let mut config = base.clone();
        config.video_extension = ".mp4".to_string();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let mut config = base.clone();
        config.dark_threshold = 300.0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let mut config = base.clone();
        config.sample_time_secs = f64::NAN;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let mut config = base.clone();
        config.codecs.audio = String::new();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let mut config = base;
        config.output_dir = config.input_dir.clone();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }
}
