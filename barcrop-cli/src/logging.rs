// ============================================================================
// barcrop-cli/src/logging.rs
// ============================================================================
//
// LOGGING: fern dispatch for console and log file
//
// Everything the core prints goes through the `log` facade. The console sink
// shows the bare message (terminal styling included); the optional file sink
// adds a timestamp, level and target, and strips ANSI escapes so the file
// stays readable.

use crate::error::CliResult;

use barcrop_core::CoreError;
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("barcrop_run_{}.log", barcrop_cli::logging::get_timestamp());
/// assert!(log_filename.starts_with("barcrop_run_2"));
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Log level selected by the `--verbose` flag.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger.
///
/// Returns the path of the log file when `log_dir` is given.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> CliResult<Option<PathBuf>> {
    let console = fern::Dispatch::new()
        .format(|out, message, record| match record.level() {
            log::Level::Error => out.finish(format_args!("ERROR: {message}")),
            log::Level::Warn => out.finish(format_args!("WARN: {message}")),
            _ => out.finish(format_args!("{message}")),
        })
        .chain(std::io::stdout());

    let mut dispatch = fern::Dispatch::new()
        .level(level_for(verbose))
        .level_for("ffmpeg_sidecar", LevelFilter::Warn)
        .chain(console);

    let mut log_path = None;
    if let Some(dir) = log_dir {
        fs::create_dir_all(dir).map_err(|e| {
            CoreError::PathError(format!("Failed to create log directory '{}': {}", dir.display(), e))
        })?;
        let path = dir.join(format!("barcrop_run_{}.log", get_timestamp()));
        let file = fern::log_file(&path)?;

        let file_sink = fern::Dispatch::new()
            .format(|out, message, record| {
                let plain = strip_ansi_escapes::strip_str(message.to_string());
                out.finish(format_args!(
                    "[{} {:<5} {}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    record.target(),
                    plain
                ))
            })
            .chain(file);
        dispatch = dispatch.chain(file_sink);
        log_path = Some(path);
    }

    dispatch
        .apply()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialise logging: {e}")))?;
    Ok(log_path)
}
