//! Temporary file management utilities.
//!
//! Per-file scratch space (the audio sidecar written before muxing) lives in
//! a `TempDir`, which removes itself when dropped, including on error paths.

use crate::error::CoreResult;
use std::path::{Path, PathBuf};
use tempfile::{Builder as TempFileBuilder, TempDir};

/// Creates a temporary directory with prefix inside `base_dir`. Auto-cleaned when dropped.
pub fn create_temp_dir(base_dir: &Path, prefix: &str) -> CoreResult<TempDir> {
    std::fs::create_dir_all(base_dir)?;

    Ok(TempFileBuilder::new()
        .prefix(prefix)
        .tempdir_in(base_dir)?)
}

/// Returns a temporary file path with random suffix. Does not create the file.
pub fn create_temp_file_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    use rand::distributions::Alphanumeric;
    use rand::{Rng, thread_rng};

    let random_suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    let filename = format!("{prefix}_{random_suffix}.{extension}");
    dir.join(filename)
}
