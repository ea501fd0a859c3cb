//! FFprobe integration for media analysis
//!
//! This module provides the trait used to query video properties and its
//! implementation on top of the `ffprobe` crate.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::processing::video_properties::VideoProperties;
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Trait for querying stream information from media files.
pub trait FfprobeExecutor {
    /// Returns dimensions, duration and audio presence for `input_path`.
    fn get_video_properties(&self, input_path: &Path) -> CoreResult<VideoProperties>;
}

/// Implementation of [`FfprobeExecutor`] backed by the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn get_video_properties(&self, input_path: &Path) -> CoreResult<VideoProperties> {
        log::debug!(
            "Running ffprobe (via crate) for video properties on: {}",
            input_path.display()
        );
        match ffprobe(input_path) {
            Ok(metadata) => {
                let duration_secs = metadata
                    .format
                    .duration
                    .as_deref()
                    .and_then(|d| d.parse::<f64>().ok())
                    .ok_or_else(|| {
                        CoreError::FfprobeParse(format!(
                            "Failed to parse duration from format for {}",
                            input_path.display()
                        ))
                    })?;

                let video_stream = metadata
                    .streams
                    .iter()
                    .find(|s| s.codec_type.as_deref() == Some("video"))
                    .ok_or_else(|| {
                        CoreError::VideoInfoError(format!(
                            "No video stream found in {}",
                            input_path.display()
                        ))
                    })?;
                let width = video_stream.width.ok_or_else(|| {
                    CoreError::VideoInfoError(format!(
                        "Video stream missing width in {}",
                        input_path.display()
                    ))
                })?;
                let height = video_stream.height.ok_or_else(|| {
                    CoreError::VideoInfoError(format!(
                        "Video stream missing height in {}",
                        input_path.display()
                    ))
                })?;

                if width <= 0 || height <= 0 {
                    return Err(CoreError::VideoInfoError(format!(
                        "Invalid dimensions found in {}: width={}, height={}",
                        input_path.display(),
                        width,
                        height
                    )));
                }

                let has_audio = metadata
                    .streams
                    .iter()
                    .any(|s| s.codec_type.as_deref() == Some("audio"));

                Ok(VideoProperties {
                    width: width as u32,
                    height: height as u32,
                    duration_secs,
                    has_audio,
                })
            }
            Err(err) => {
                log::error!(
                    "ffprobe failed for video properties on {}: {:?}",
                    input_path.display(),
                    err
                );
                Err(map_ffprobe_error(err, "video properties"))
            }
        }
    }
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => CoreError::JsonParseError(format!(
            "ffprobe {context} output deserialization: {err}"
        )),
        _ => CoreError::FfprobeParse(format!("Unknown ffprobe error during {context}: {err:?}")),
    }
}
