// ============================================================================
// barcrop-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates everything that talks to the ffmpeg and ffprobe
// executables. The rest of the crate only sees the VideoToolkit trait, which
// exposes the three capabilities the batch runner needs: probing a file,
// sampling one decoded frame, and writing a cropped copy.
//
// KEY COMPONENTS:
// - VideoToolkit: capability trait consumed by detection and batch processing
// - FfmpegToolkit: production implementation over the spawner/executor traits
// - FfmpegSpawner / FfprobeExecutor: low-level process abstractions
// - Dependency checking for the ffmpeg and ffprobe binaries
//
// Tests replace either layer: a fake VideoToolkit producing synthetic frames,
// or the mock spawner/executor in `mocks` to inspect the exact commands.

use crate::error::{CoreError, CoreResult};
use crate::processing::frame::Frame;
use crate::processing::video_properties::VideoProperties;

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// ffmpeg invocations for frame sampling and crop encoding
pub mod ffmpeg;

/// Argument list builder for ffmpeg commands
pub mod ffmpeg_builder;

/// Traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Traits and implementations for executing ffprobe commands
pub mod ffprobe_executor;

/// Test doubles for the spawner and ffprobe traits
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg::CropEncodeParams;
pub use ffmpeg_builder::{FfmpegCommandBuilder, FfmpegInvocation};
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{CrateFfprobeExecutor, FfprobeExecutor};

// ============================================================================
// VIDEO TOOLKIT
// ============================================================================

/// Video capabilities required by border detection and batch cropping.
pub trait VideoToolkit {
    /// Reads dimensions, duration and audio presence.
    fn probe(&self, input_path: &Path) -> CoreResult<VideoProperties>;

    /// Decodes the frame shown at `at_secs`.
    fn sample_frame(&self, input_path: &Path, at_secs: f64) -> CoreResult<Frame>;

    /// Writes the cropped region of a video to a new file.
    fn write_cropped(&self, params: &CropEncodeParams) -> CoreResult<()>;
}

/// [`VideoToolkit`] implemented with ffmpeg and ffprobe.
#[derive(Debug, Clone, Default)]
pub struct FfmpegToolkit<S = SidecarSpawner, P = CrateFfprobeExecutor> {
    spawner: S,
    ffprobe: P,
}

impl FfmpegToolkit {
    /// Toolkit running the real ffmpeg and ffprobe binaries.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: FfmpegSpawner, P: FfprobeExecutor> FfmpegToolkit<S, P> {
    /// Toolkit over custom spawner and ffprobe implementations.
    pub fn with_executors(spawner: S, ffprobe: P) -> Self {
        Self { spawner, ffprobe }
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }
}

impl<S: FfmpegSpawner, P: FfprobeExecutor> VideoToolkit for FfmpegToolkit<S, P> {
    fn probe(&self, input_path: &Path) -> CoreResult<VideoProperties> {
        self.ffprobe.get_video_properties(input_path)
    }

    fn sample_frame(&self, input_path: &Path, at_secs: f64) -> CoreResult<Frame> {
        ffmpeg::sample_frame(&self.spawner, input_path, at_secs)
    }

    fn write_cropped(&self, params: &CropEncodeParams) -> CoreResult<()> {
        ffmpeg::run_crop_encode(&self.spawner, params)
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// The command is run with `-version` and its output discarded.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}

/// Checks for both ffmpeg and ffprobe.
pub fn check_dependencies() -> CoreResult<()> {
    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency() {
        let result = check_dependency("barcrop-surely-not-an-installed-binary");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(name)) if name.starts_with("barcrop-")));
    }
}
