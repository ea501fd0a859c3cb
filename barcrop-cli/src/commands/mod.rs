//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Copies or crops every video of the input directory.
pub mod crop;

/// Prints detected borders without writing any output.
pub mod detect;

use crate::error::CliResult;

use barcrop_core::CoreError;
use std::path::{Path, PathBuf};

/// Resolves the input directory, failing when it does not exist or is not a directory.
pub(crate) fn resolve_input_dir(input_dir: &Path) -> CliResult<PathBuf> {
    let resolved = input_dir.canonicalize().map_err(|e| {
        CoreError::PathError(format!(
            "Invalid input directory '{}': {}",
            input_dir.display(),
            e
        ))
    })?;

    if !resolved.is_dir() {
        return Err(CoreError::PathError(format!(
            "Invalid input directory '{}': not a directory",
            input_dir.display()
        )));
    }
    Ok(resolved)
}

/// Lists the videos to process; an empty directory is not an error.
pub(crate) fn discover_files(input_dir: &Path, extension: &str) -> CliResult<Vec<PathBuf>> {
    match barcrop_core::find_processable_files(input_dir, extension) {
        Ok(files) => Ok(files),
        Err(CoreError::NoFilesFound) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}
