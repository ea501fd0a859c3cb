// barcrop-core/tests/ffmpeg_wrapper_tests.rs
//
// FfmpegToolkit driven by the mock spawner and ffprobe executor, checking the
// exact ffmpeg invocations and the scratch directory lifecycle.

use barcrop_core::config::Codecs;
use barcrop_core::error::CoreError;
use barcrop_core::external::mocks::{MockFfmpegSpawner, MockFfprobeExecutor};
use barcrop_core::external::{CropEncodeParams, FfmpegToolkit, VideoToolkit};
use barcrop_core::processing::video::{FileStatus, process_videos};
use barcrop_core::{CoreConfig, CropRegion, VideoProperties};
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress, LogLevel, OutputVideoFrame};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn rgb_frame_event(width: u32, height: u32, border: u32) -> FfmpegEvent {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for _y in 0..height {
        for x in 0..width {
            let v = if x < border || x >= width - border { 0 } else { 128 };
            data.extend_from_slice(&[v, v, v]);
        }
    }
    FfmpegEvent::OutputFrame(OutputVideoFrame {
        width,
        height,
        pix_fmt: "rgb24".to_string(),
        output_index: 0,
        data,
        frame_num: 0,
        timestamp: 1.0,
    })
}

fn progress_event(time: &str) -> FfmpegEvent {
    FfmpegEvent::Progress(FfmpegProgress {
        frame: 25,
        fps: 25.0,
        q: 0.0,
        size_kb: 512,
        time: time.to_string(),
        bitrate_kbps: 1000.0,
        speed: 1.0,
        raw_log_message: String::new(),
    })
}

fn scratch_dirs(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.file_name().unwrap().to_string_lossy().starts_with(".barcrop_"))
        .collect()
}

fn encode_params(input: &Path, output_dir: &Path, has_audio: bool) -> CropEncodeParams {
    CropEncodeParams {
        input_path: input.to_path_buf(),
        output_path: output_dir.join("clip.mp4"),
        region: CropRegion {
            x: 12,
            width: 296,
            height: 180,
        },
        codecs: Codecs::default(),
        has_audio,
        duration_secs: 10.0,
        temp_base_dir: output_dir.to_path_buf(),
    }
}

#[test]
fn test_sample_frame_from_rawvideo_output() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("rawvideo", vec![rgb_frame_event(32, 4, 3)], false);
    let toolkit = FfmpegToolkit::with_executors(spawner.clone(), MockFfprobeExecutor::new());

    let frame = toolkit.sample_frame(Path::new("in/clip.mp4"), 1.0)?;
    assert_eq!((frame.width(), frame.height()), (32, 4));
    assert_eq!(barcrop_core::detect_borders(&frame, 15.0).left, 3);

    let calls = spawner.get_received_calls();
    assert_eq!(calls.len(), 1);
    let args = &calls[0];
    let ss = args.iter().position(|a| a == "-ss").unwrap();
    let input = args.iter().position(|a| a == "-i").unwrap();
    assert!(ss < input, "seek must come before the input");
    assert_eq!(args[ss + 1], "1.000");
    assert!(args.windows(2).any(|w| w[0] == "-pix_fmt" && w[1] == "rgb24"));
    assert_eq!(args.last().map(String::as_str), Some("-"));
    Ok(())
}

#[test]
fn test_sample_frame_without_output_is_decode_error() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("rawvideo", vec![], false);
    let toolkit = FfmpegToolkit::with_executors(spawner, MockFfprobeExecutor::new());

    let result = toolkit.sample_frame(Path::new("in/clip.mp4"), 1.0);
    assert!(matches!(result, Err(CoreError::FrameDecode(_))));
}

#[test]
fn test_sample_frame_exit_error() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_exit_error_expectation(
        "rawvideo",
        vec![FfmpegEvent::Log(LogLevel::Error, "moov atom not found".to_string())],
        1,
    );
    let toolkit = FfmpegToolkit::with_executors(spawner, MockFfprobeExecutor::new());

    match toolkit.sample_frame(Path::new("in/clip.mp4"), 1.0) {
        Err(CoreError::CommandFailed { stderr, .. }) => assert!(stderr.contains("moov atom")),
        other => panic!("Expected CommandFailed, got {:?}", other),
    }
}

#[test]
fn test_crop_with_audio_uses_sidecar_and_cleans_up() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = tempdir()?;
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("-vn", vec![], true);
    spawner.add_success_expectation(
        "crop=",
        vec![progress_event("00:00:05.00"), progress_event("00:00:10.00")],
        true,
    );
    let toolkit = FfmpegToolkit::with_executors(spawner.clone(), MockFfprobeExecutor::new());

    let params = encode_params(Path::new("in/clip.mp4"), output_dir.path(), true);
    toolkit.write_cropped(&params)?;

    let calls = spawner.get_received_calls();
    assert_eq!(calls.len(), 2);

    let sidecar_args = &calls[0];
    let sidecar = sidecar_args.last().unwrap().clone();
    assert!(sidecar.ends_with(".m4a"));
    assert!(sidecar_args.windows(2).any(|w| w[0] == "-c:a" && w[1] == "aac"));

    let crop_args = &calls[1];
    assert!(crop_args.iter().any(|a| a == &sidecar), "sidecar must be muxed in");
    assert!(crop_args.windows(2).any(|w| w[0] == "-vf" && w[1] == "crop=296:180:12:0"));
    assert!(crop_args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "libx264"));
    assert!(crop_args.windows(2).any(|w| w[0] == "-c:a" && w[1] == "copy"));
    assert_eq!(crop_args.last(), Some(&params.output_path.to_string_lossy().to_string()));

    assert!(params.output_path.exists());
    assert!(!Path::new(&sidecar).exists());
    assert!(scratch_dirs(output_dir.path()).is_empty());
    Ok(())
}

#[test]
fn test_crop_failure_still_removes_sidecar() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = tempdir()?;
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("-vn", vec![], true);
    spawner.add_exit_error_expectation(
        "crop=",
        vec![FfmpegEvent::Error("Invalid too big or non positive size".to_string())],
        1,
    );
    let toolkit = FfmpegToolkit::with_executors(spawner.clone(), MockFfprobeExecutor::new());

    let params = encode_params(Path::new("in/clip.mp4"), output_dir.path(), true);
    let result = toolkit.write_cropped(&params);

    assert!(matches!(result, Err(CoreError::CommandFailed { .. })));
    assert_eq!(spawner.get_received_calls().len(), 2);
    assert!(scratch_dirs(output_dir.path()).is_empty());
    Ok(())
}

#[test]
fn test_crop_without_audio_skips_sidecar() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = tempdir()?;
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("crop=", vec![], true);
    let toolkit = FfmpegToolkit::with_executors(spawner.clone(), MockFfprobeExecutor::new());

    let params = encode_params(Path::new("in/clip.mp4"), output_dir.path(), false);
    toolkit.write_cropped(&params)?;

    let calls = spawner.get_received_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].iter().any(|a| a == "-an"));
    assert_eq!(calls[0].iter().filter(|a| *a == "-i").count(), 1);
    assert_eq!(spawner.pending_expectations(), 0);
    Ok(())
}

#[test]
fn test_batch_through_mock_executors() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;
    let input = input_dir.path().join("clip.mp4");
    fs::write(&input, b"video")?;

    let ffprobe = MockFfprobeExecutor::new();
    ffprobe.expect_video_properties(
        &input,
        Ok(VideoProperties {
            width: 320,
            height: 180,
            duration_secs: 10.0,
            has_audio: false,
        }),
    );

    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("rawvideo", vec![rgb_frame_event(320, 180, 12)], false);
    spawner.add_success_expectation("crop=", vec![], true);

    let toolkit = FfmpegToolkit::with_executors(spawner.clone(), ffprobe);
    let config = CoreConfig::new(input_dir.path().to_path_buf(), output_dir.path().to_path_buf());
    let result = process_videos(&toolkit, &config, &[input]);

    assert_eq!(result.succeeded(), 1);
    match &result.reports[0].status {
        FileStatus::Cropped { crop, output_width } => {
            assert_eq!((crop.left, crop.right), (12, 12));
            assert_eq!(*output_width, 296);
        }
        other => panic!("Expected Cropped, got {:?}", other),
    }

    let calls = spawner.get_received_calls();
    assert!(calls[1].iter().any(|a| a == "crop=296:180:12:0"));
    Ok(())
}
