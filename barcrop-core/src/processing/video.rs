// ============================================================================
// barcrop-core/src/processing/video.rs
// ============================================================================
//
// BATCH CROPPING: Per-file orchestration
//
// This module drives a batch over the discovered input files. Each file goes
// through the same steps, and a failure at any step only ends that file:
//
// WORKFLOW:
// 1. Probe the video properties (width, height, duration, audio)
// 2. Sample one frame and detect the left/right borders
// 3. No border: copy the file unchanged to the output directory
// 4. Border present: crop and re-encode it into the output directory
//
// Every file ends up with a FileReport; the batch itself only fails for
// problems that prevent any file from being processed.

use crate::config::CoreConfig;
use crate::discovery::find_processable_files;
use crate::error::{CoreError, CoreResult};
use crate::external::{CropEncodeParams, VideoToolkit};
use crate::processing::border_detection::{CropSpec, DetectedBorders, detect_video_borders};
use crate::processing::video_properties::VideoProperties;
use crate::terminal;
use crate::utils::{format_bytes, format_duration, get_filename_safe};

use log::{debug, info};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Step at which a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Probe,
    Decode,
    Copy,
    Encode,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureStage::Probe => "probe",
            FailureStage::Decode => "decode",
            FailureStage::Copy => "copy",
            FailureStage::Encode => "encode",
        };
        f.write_str(name)
    }
}

/// Final state of one file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    /// No border was found and the file was copied unchanged
    Copied,
    /// Borders were removed and the video re-encoded
    Cropped { crop: CropSpec, output_width: u32 },
    /// Processing stopped at `stage`
    Failed { stage: FailureStage, message: String },
}

impl FileStatus {
    pub fn is_success(&self) -> bool {
        !matches!(self, FileStatus::Failed { .. })
    }
}

/// Result of processing a single input file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub filename: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Detected margins, when detection got that far
    pub crop: Option<CropSpec>,
    pub status: FileStatus,
    pub elapsed: Duration,
}

/// Reports for every file of a batch, in processing order.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub reports: Vec<FileReport>,
    pub output_dir: PathBuf,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.status.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

/// Detected margins for one file, as produced by [`detect_only`].
#[derive(Debug)]
pub struct DetectionReport {
    pub filename: String,
    pub input_path: PathBuf,
    pub result: CoreResult<CropSpec>,
}

// ============================================================================
// BATCH ENTRY POINTS
// ============================================================================

/// Resolved directories and discovered input files of a batch.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    /// Configuration with canonical input and output directories
    pub config: CoreConfig,
    /// Matching input files, sorted by name
    pub files: Vec<PathBuf>,
}

/// Prepares a batch: validates the configuration, creates the output
/// directory and lists the input files.
///
/// Both directories are canonicalized before they are compared, so aliases
/// such as `videos` and `videos/../videos` are recognised as the same
/// directory and rejected.
pub fn prepare_batch(config: &CoreConfig) -> CoreResult<BatchPlan> {
    config.validate()?;

    fs::create_dir_all(&config.output_dir).map_err(|e| {
        CoreError::PathError(format!(
            "Failed to create output directory {}: {}",
            config.output_dir.display(),
            e
        ))
    })?;

    let input_dir = config.input_dir.canonicalize()?;
    let output_dir = config.output_dir.canonicalize()?;
    if input_dir == output_dir {
        return Err(CoreError::Config(format!(
            "output directory must differ from the input directory ({})",
            input_dir.display()
        )));
    }

    let files = match find_processable_files(&input_dir, &config.video_extension) {
        Ok(files) => files,
        Err(CoreError::NoFilesFound) => {
            info!(
                "No .{} files found in {}",
                config.video_extension,
                input_dir.display()
            );
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    let mut config = config.clone();
    config.input_dir = input_dir;
    config.output_dir = output_dir;
    Ok(BatchPlan { config, files })
}

/// Runs a complete batch: creates the output directory, discovers the input
/// files and processes them in order.
///
/// # Returns
///
/// * `Ok(BatchResult)` - Per-file outcomes, possibly empty
/// * `Err(CoreError)` - If the configuration is invalid, the output directory
///   cannot be created or the input directory cannot be listed
///
/// # Examples
///
/// ```rust,no_run
/// use barcrop_core::{CoreConfig, FfmpegToolkit, run};
/// use std::path::PathBuf;
///
/// let config = CoreConfig::new(PathBuf::from("videos"), PathBuf::from("videos/cropped"));
/// let result = run(&FfmpegToolkit::new(), &config).unwrap();
/// println!("Completed: {}/{}", result.succeeded(), result.total());
/// ```
pub fn run<T: VideoToolkit>(toolkit: &T, config: &CoreConfig) -> CoreResult<BatchResult> {
    let plan = prepare_batch(config)?;
    Ok(process_videos(toolkit, &plan.config, &plan.files))
}

/// Processes `files` one after another.
///
/// Never fails as a whole: each file's outcome, including any error, is
/// recorded in its [`FileReport`].
pub fn process_videos<T: VideoToolkit>(toolkit: &T, config: &CoreConfig, files: &[PathBuf]) -> BatchResult {
    let mut reports = Vec::with_capacity(files.len());

    for (index, input_path) in files.iter().enumerate() {
        let started = Instant::now();
        let filename = display_name(input_path);
        let output_path = config.output_dir.join(&filename);

        terminal::print_processing(&format!("[{}/{}] {}", index + 1, files.len(), filename));

        let (crop, status) = process_file(toolkit, config, input_path, &output_path);
        let elapsed = started.elapsed();

        match &status {
            FileStatus::Copied => {
                terminal::print_success(&format!("No borders, copied in {}", format_duration(elapsed.as_secs_f64())));
            }
            FileStatus::Cropped { crop, output_width } => {
                terminal::print_success(&format!(
                    "Cropped {} to {}px wide in {}",
                    crop,
                    output_width,
                    format_duration(elapsed.as_secs_f64())
                ));
            }
            FileStatus::Failed { stage, message } => {
                debug!("Failed to process {} during {}: {}", filename, stage, message);
                terminal::print_error(&format!("Failed during {stage}"), message, None);
            }
        }

        reports.push(FileReport {
            filename,
            input_path: input_path.clone(),
            output_path,
            crop,
            status,
            elapsed,
        });
    }

    BatchResult {
        reports,
        output_dir: config.output_dir.clone(),
    }
}

/// Detects the borders of `files` without writing anything.
pub fn detect_only<T: VideoToolkit>(toolkit: &T, config: &CoreConfig, files: &[PathBuf]) -> Vec<DetectionReport> {
    files
        .iter()
        .map(|input_path| {
            let filename = display_name(input_path);
            let result = toolkit
                .probe(input_path)
                .and_then(|props| detect_video_borders(toolkit, input_path, &props, config))
                .map(|detected| detected.crop);
            DetectionReport {
                filename,
                input_path: input_path.clone(),
                result,
            }
        })
        .collect()
}

// ============================================================================
// PER-FILE PROCESSING
// ============================================================================

/// File name used in messages and as the output name.
fn display_name(path: &Path) -> String {
    get_filename_safe(path).unwrap_or_else(|_| path.display().to_string())
}

fn failed(stage: FailureStage, err: CoreError) -> FileStatus {
    FileStatus::Failed {
        stage,
        message: err.to_string(),
    }
}

fn process_file<T: VideoToolkit>(
    toolkit: &T,
    config: &CoreConfig,
    input_path: &Path,
    output_path: &Path,
) -> (Option<CropSpec>, FileStatus) {
    let props = match toolkit.probe(input_path) {
        Ok(props) => props,
        Err(e) => return (None, failed(FailureStage::Probe, e)),
    };
    terminal::print_status(
        "Video",
        &format!(
            "{}x{}, {}",
            props.width,
            props.height,
            format_duration(props.duration_secs)
        ),
        false,
    );

    let detected = match detect_video_borders(toolkit, input_path, &props, config) {
        Ok(detected) => detected,
        Err(e) => return (None, failed(FailureStage::Decode, e)),
    };
    let crop = detected.crop;
    terminal::print_status("Borders", &crop.to_string(), !crop.is_empty());

    if crop.is_empty() {
        let status = match copy_unchanged(input_path, output_path) {
            Ok(()) => FileStatus::Copied,
            Err(e) => failed(FailureStage::Copy, e),
        };
        return (Some(crop), status);
    }

    let status = match crop_video(toolkit, config, input_path, output_path, &detected, &props) {
        Ok(output_width) => FileStatus::Cropped { crop, output_width },
        Err(e) => failed(FailureStage::Encode, e),
    };
    (Some(crop), status)
}

fn crop_video<T: VideoToolkit>(
    toolkit: &T,
    config: &CoreConfig,
    input_path: &Path,
    output_path: &Path,
    detected: &DetectedBorders,
    props: &VideoProperties,
) -> CoreResult<u32> {
    let region = detected.region()?;
    replace_existing_output(input_path, output_path)?;
    terminal::print_sub_item(&format!(
        "Encoding {}x{} with {}/{}",
        region.width, region.height, config.codecs.video, config.codecs.audio
    ));

    let params = CropEncodeParams {
        input_path: input_path.to_path_buf(),
        output_path: output_path.to_path_buf(),
        region,
        codecs: config.codecs.clone(),
        has_audio: props.has_audio,
        duration_secs: props.duration_secs,
        temp_base_dir: config.temp_base_dir().clone(),
    };
    toolkit.write_cropped(&params)?;
    Ok(region.width)
}

/// Returns true when both paths name the same existing file.
#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    matches!((a.canonicalize(), b.canonicalize()), (Ok(a), Ok(b)) if a == b)
}

/// Clears the way for a new output file.
///
/// Refuses to write over the input itself. An existing output is removed
/// first, so that a read-only copy from an earlier run does not block the
/// overwrite.
fn replace_existing_output(input_path: &Path, output_path: &Path) -> CoreResult<()> {
    if is_same_file(input_path, output_path) {
        return Err(CoreError::PathError(format!(
            "{} and {} are the same file",
            input_path.display(),
            output_path.display()
        )));
    }

    match fs::symlink_metadata(output_path) {
        Ok(meta) if !meta.is_dir() => {
            debug!("Removing existing output {}", output_path.display());
            fs::remove_file(output_path)?;
        }
        _ => {}
    }
    Ok(())
}

/// Copies `input_path` byte for byte, keeping its permissions and
/// modification time.
fn copy_unchanged(input_path: &Path, output_path: &Path) -> CoreResult<()> {
    replace_existing_output(input_path, output_path)?;
    let bytes = fs::copy(input_path, output_path)?;
    let modified = fs::metadata(input_path)?.modified()?;
    // The copy may already carry a read-only mode; the owner can still set
    // the timestamps through a read handle.
    fs::File::open(output_path)?.set_modified(modified)?;
    debug!(
        "Copied {} ({}) to {}",
        input_path.display(),
        format_bytes(bytes),
        output_path.display()
    );
    Ok(())
}
