// barcrop-cli/src/lib.rs
//
// Library portion of the barcrop CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, CropArgs, DetectArgs, DetectionOptions};
pub use commands::crop::run_crop;
pub use commands::detect::run_detect;
