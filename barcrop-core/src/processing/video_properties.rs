//! Structure for video metadata.
//!
//! This file defines the VideoProperties structure filled in by ffprobe. The
//! batch runner needs the duration to pick a sample time, the dimensions to
//! build the crop rectangle, and the audio flag to decide whether a sidecar
//! audio track has to be encoded.

/// Video metadata including resolution, duration, and audio presence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoProperties {
    /// Width of the video in pixels
    pub width: u32,

    /// Height of the video in pixels
    pub height: u32,

    /// Duration of the video in seconds
    pub duration_secs: f64,

    /// Whether the container holds at least one audio stream
    pub has_audio: bool,
}
