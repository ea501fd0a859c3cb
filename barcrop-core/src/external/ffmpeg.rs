//! ffmpeg invocations used by barcrop.
//!
//! Two operations are needed from ffmpeg: decoding a single frame to raw RGB
//! at a given timestamp, and re-encoding a horizontally cropped copy of a
//! video. Cropping with audio goes through a temporary AAC sidecar that is
//! muxed into the final file; the sidecar's directory is removed when the
//! encode returns, whatever the outcome.

use crate::config::Codecs;
use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::ffmpeg_builder::{FfmpegCommandBuilder, FfmpegInvocation};
use crate::external::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use crate::processing::border_detection::CropRegion;
use crate::processing::frame::Frame;
use crate::{temp_files, terminal, utils};

use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::path::{Path, PathBuf};

/// Number of trailing ffmpeg error lines kept for error messages.
const STDERR_TAIL_LINES: usize = 8;

/// Everything needed to produce one cropped output file.
#[derive(Debug, Clone)]
pub struct CropEncodeParams {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub region: CropRegion,
    pub codecs: Codecs,
    /// Whether the input carries audio that must be kept
    pub has_audio: bool,
    /// Duration of the input, used for progress reporting
    pub duration_secs: f64,
    /// Directory under which the per-file scratch directory is created
    pub temp_base_dir: PathBuf,
}

/// Builds the command decoding one frame at `at_secs` to raw RGB24 on stdout.
pub fn build_sample_frame_command(input_path: &Path, at_secs: f64) -> FfmpegInvocation {
    FfmpegCommandBuilder::new()
        .seek(at_secs)
        .input(input_path)
        .args(["-frames:v", "1", "-an", "-sn"])
        .args(["-f", "rawvideo", "-pix_fmt", "rgb24"])
        .output("-")
}

/// Builds the command encoding the input's audio to a standalone sidecar file.
pub fn build_audio_sidecar_command(input_path: &Path, sidecar: &Path, audio_codec: &str) -> FfmpegInvocation {
    FfmpegCommandBuilder::new()
        .with_overwrite(true)
        .input(input_path)
        .args(["-vn", "-sn", "-map", "0:a:0"])
        .args(["-c:a", audio_codec])
        .output(sidecar.to_string_lossy())
}

/// Builds the crop-and-encode command, muxing `sidecar` as the audio track when given.
pub fn build_crop_command(params: &CropEncodeParams, sidecar: Option<&Path>) -> FfmpegInvocation {
    let mut builder = FfmpegCommandBuilder::new()
        .with_overwrite(true)
        .input(&params.input_path);

    if let Some(sidecar) = sidecar {
        builder = builder.input(sidecar).args(["-map", "0:v:0", "-map", "1:a:0"]);
    } else {
        builder = builder.args(["-map", "0:v:0"]);
    }

    builder = builder
        .arg("-vf")
        .arg(params.region.to_filter())
        .args(["-c:v", params.codecs.video.as_str()]);

    builder = if sidecar.is_some() {
        builder.args(["-c:a", "copy"])
    } else {
        builder.arg("-an")
    };

    builder.output(params.output_path.to_string_lossy())
}

/// Decodes the frame at `at_secs` of `input_path`.
pub fn sample_frame<S: FfmpegSpawner>(spawner: &S, input_path: &Path, at_secs: f64) -> CoreResult<Frame> {
    let invocation = build_sample_frame_command(input_path, at_secs);
    let mut process = spawner.spawn(&invocation)?;

    let mut frame: Option<Frame> = None;
    let mut stderr_tail: Vec<String> = Vec::new();

    process.handle_events(|event| {
        match event {
            FfmpegEvent::OutputFrame(output) => {
                if frame.is_none() {
                    frame = Some(Frame::from_rgb24(output.width, output.height, output.data)?);
                }
            }
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) | FfmpegEvent::Error(line) => {
                push_tail(&mut stderr_tail, line);
            }
            _ => {}
        }
        Ok(())
    })?;

    let status = process.wait()?;
    if !status.success() {
        return Err(command_failed_error(
            "ffmpeg (frame sample)",
            status,
            stderr_tail.join("\n"),
        ));
    }

    frame.ok_or_else(|| {
        CoreError::FrameDecode(format!(
            "ffmpeg produced no frame at {:.3}s of {}",
            at_secs,
            input_path.display()
        ))
    })
}

/// Crops and re-encodes a video according to `params`.
pub fn run_crop_encode<S: FfmpegSpawner>(spawner: &S, params: &CropEncodeParams) -> CoreResult<()> {
    let scratch = temp_files::create_temp_dir(&params.temp_base_dir, ".barcrop_")?;

    let sidecar = if params.has_audio {
        let sidecar = temp_files::create_temp_file_path(scratch.path(), "audio_sidecar", "m4a");
        let invocation = build_audio_sidecar_command(&params.input_path, &sidecar, &params.codecs.audio);
        run_ffmpeg(spawner, &invocation, "ffmpeg (audio sidecar)", None)?;
        Some(sidecar)
    } else {
        log::debug!("{} has no audio stream, encoding video only", params.input_path.display());
        None
    };

    let invocation = build_crop_command(params, sidecar.as_deref());
    let result = run_ffmpeg(spawner, &invocation, "ffmpeg (crop encode)", Some(params.duration_secs));
    terminal::clear_progress_bar();
    result?;

    log::debug!("Removing scratch directory {}", scratch.path().display());
    scratch.close()?;
    Ok(())
}

/// Runs an ffmpeg command to completion, turning a non-zero exit into an error.
fn run_ffmpeg<S: FfmpegSpawner>(
    spawner: &S,
    invocation: &FfmpegInvocation,
    label: &str,
    progress_total_secs: Option<f64>,
) -> CoreResult<()> {
    log::debug!("{}: {}", label, invocation);
    let mut process = spawner.spawn(invocation)?;
    let mut stderr_tail: Vec<String> = Vec::new();

    process.handle_events(|event| {
        match event {
            FfmpegEvent::Progress(progress) => {
                if let (Some(total), Some(elapsed)) =
                    (progress_total_secs, utils::parse_ffmpeg_time(&progress.time))
                {
                    terminal::update_progress_bar(elapsed, total);
                }
            }
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) | FfmpegEvent::Error(line) => {
                log::debug!("{}: {}", label, line);
                push_tail(&mut stderr_tail, line);
            }
            _ => {}
        }
        Ok(())
    })?;

    let status = process.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(command_failed_error(label, status, stderr_tail.join("\n")))
    }
}

fn push_tail(tail: &mut Vec<String>, line: String) {
    if tail.len() == STDERR_TAIL_LINES {
        tail.remove(0);
    }
    tail.push(line);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(has_audio: bool) -> CropEncodeParams {
        CropEncodeParams {
            input_path: PathBuf::from("in/clip.mp4"),
            output_path: PathBuf::from("out/clip.mp4"),
            region: CropRegion {
                x: 10,
                width: 85,
                height: 40,
            },
            codecs: Codecs::default(),
            has_audio,
            duration_secs: 12.0,
            temp_base_dir: PathBuf::from("out"),
        }
    }

    #[test]
    fn test_sample_frame_command() {
        let invocation = build_sample_frame_command(Path::new("in/clip.mp4"), 0.4);
        assert_eq!(
            invocation.args(),
            [
                "-hide_banner", "-ss", "0.400", "-i", "in/clip.mp4", "-frames:v", "1", "-an", "-sn",
                "-f", "rawvideo", "-pix_fmt", "rgb24", "-"
            ]
        );
    }

    #[test]
    fn test_crop_command_with_sidecar() {
        let invocation = build_crop_command(&params(true), Some(Path::new("tmp/audio_sidecar_abc123.m4a")));
        assert_eq!(
            invocation.args(),
            [
                "-hide_banner", "-y", "-i", "in/clip.mp4", "-i", "tmp/audio_sidecar_abc123.m4a",
                "-map", "0:v:0", "-map", "1:a:0", "-vf", "crop=85:40:10:0", "-c:v", "libx264",
                "-c:a", "copy", "out/clip.mp4"
            ]
        );
    }

    #[test]
    fn test_crop_command_without_audio() {
        let invocation = build_crop_command(&params(false), None);
        assert!(invocation.contains("crop=85:40:10:0"));
        assert!(invocation.args().iter().any(|a| a == "-an"));
        assert!(!invocation.contains("1:a:0"));
        assert_eq!(invocation.output(), Some("out/clip.mp4"));
    }

    #[test]
    fn test_audio_sidecar_command() {
        let invocation = build_audio_sidecar_command(
            Path::new("in/clip.mp4"),
            Path::new("tmp/audio_sidecar_abc123.m4a"),
            "aac",
        );
        assert!(invocation.args().iter().any(|a| a == "-vn"));
        assert!(invocation.contains("aac"));
        assert_eq!(invocation.output(), Some("tmp/audio_sidecar_abc123.m4a"));
    }

    #[test]
    fn test_push_tail_keeps_last_lines() {
        let mut tail = Vec::new();
        for i in 0..(STDERR_TAIL_LINES + 3) {
            push_tail(&mut tail, format!("line {i}"));
        }
        assert_eq!(tail.len(), STDERR_TAIL_LINES);
        assert_eq!(tail[0], "line 3");
    }
}
