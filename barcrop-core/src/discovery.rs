//! File discovery module for finding video files to process.
//!
//! Only the top level of the input directory is searched. Matching is done on
//! the file extension, ignoring ASCII case, and the result is sorted so that
//! reports come out in a stable order.

use crate::error::{CoreError, CoreResult};

use std::path::{Path, PathBuf};

/// Finds video files with the given extension in `input_dir`.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - The matching files, sorted lexicographically
/// * `Err(CoreError::Io)` - If the directory cannot be read
/// * `Err(CoreError::NoFilesFound)` - If nothing matches
///
/// # Examples
///
/// ```rust,no_run
/// use barcrop_core::find_processable_files;
/// use std::path::Path;
///
/// match find_processable_files(Path::new("/path/to/videos"), "mp4") {
///     Ok(files) => println!("Found {} video files", files.len()),
///     Err(e) => println!("Error finding video files: {}", e),
/// }
/// ```
pub fn find_processable_files(input_dir: &Path, extension: &str) -> CoreResult<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(input_dir)?;
    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();

            if !path.is_file() {
                return None;
            }

            has_extension(&path, extension).then_some(path)
        })
        .collect();

    if files.is_empty() {
        return Err(CoreError::NoFilesFound);
    }

    files.sort();
    log::debug!(
        "Discovered {} .{} file(s) in {}",
        files.len(),
        extension,
        input_dir.display()
    );
    Ok(files)
}

/// Checks whether `path` carries `extension`, ignoring ASCII case.
#[must_use]
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("clip.mp4"), "mp4"));
        assert!(has_extension(Path::new("CLIP.MP4"), "mp4"));
        assert!(!has_extension(Path::new("clip.mp4.part"), "mp4"));
        assert!(!has_extension(Path::new("mp4"), "mp4"));
        assert!(!has_extension(Path::new("clip.mkv"), "mp4"));
    }
}
