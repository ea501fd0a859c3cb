//! Terminal UI components and styling for barcrop.
//!
//! Output goes through the `log` facade at info level so that the CLI's
//! logger decides where it ends up (console, log file, or both). Colours are
//! dropped when `NO_COLOR` is set. The encode progress bar is drawn on stderr
//! only when stderr is a terminal.

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::sync::{LazyLock, Mutex};
use std::time::Duration;

/// Represents the visual hierarchy levels in the CLI output
#[derive(Debug, Clone, Copy)]
pub enum OutputLevel {
    /// Level 1: Main sections (===== SECTION =====)
    Section,
    /// Level 2: Per-file headers (» file.mp4)
    Subsection,
    /// Level 3: Steps within a file
    Progress,
    /// Level 4: Key-value status information
    Status,
}

impl OutputLevel {
    fn indent(&self) -> &'static str {
        match self {
            OutputLevel::Section => "",
            OutputLevel::Subsection => "  ",
            OutputLevel::Progress => "    ",
            OutputLevel::Status => "      ",
        }
    }
}

static CURRENT_PROGRESS: LazyLock<Mutex<Option<ProgressBar>>> = LazyLock::new(|| Mutex::new(None));

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Print a section header for major workflow phases
pub fn print_section(title: &str) {
    info!("");
    if should_use_color() {
        info!("===== {} =====", title.to_uppercase().cyan());
    } else {
        info!("===== {} =====", title.to_uppercase());
    }
    info!("");
}

/// Print an item at the specified hierarchy level
pub fn print_item(level: OutputLevel, symbol: Option<&str>, text: &str, bold: bool) {
    let indent = level.indent();
    let prefix = match symbol {
        Some(sym) => format!("{indent}{sym} "),
        None => indent.to_string(),
    };

    if should_use_color() && bold {
        info!("{}{}", prefix, style(text).bold());
    } else {
        info!("{prefix}{text}");
    }
}

/// Print a per-file header
pub fn print_processing(message: &str) {
    info!("");
    print_item(OutputLevel::Subsection, Some("»"), message, true);
}

/// Print a step within the current file
pub fn print_sub_item(message: &str) {
    print_item(OutputLevel::Progress, None, message, false);
}

/// Print a status line (key-value pair)
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let label_width = 15;
    let label_len = label.chars().count();
    let padding = if label_len < label_width {
        label_width - label_len
    } else {
        1
    };

    let value = if should_use_color() && highlight {
        value.bold().to_string()
    } else {
        value.to_string()
    };

    info!(
        "{}{}:{} {}",
        OutputLevel::Status.indent(),
        label,
        " ".repeat(padding),
        value
    );
}

/// Print a success message
pub fn print_success(message: &str) {
    if should_use_color() {
        info!("    ✓ {}", message.green());
    } else {
        info!("    ✓ {message}");
    }
}

/// Print an error message
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    if should_use_color() {
        info!("    ✗ {}", title.red().bold());
    } else {
        info!("    ✗ {title}");
    }
    info!("      Message:  {message}");

    if let Some(suggestion_text) = suggestion {
        info!("      Suggestion: {suggestion_text}");
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    if should_use_color() {
        info!("    ⚠ {}", message.yellow());
    } else {
        info!("    ⚠ {message}");
    }
}

/// Initialize a progress bar with indicatif
fn init_progress_bar(total_secs: f64) -> ProgressBar {
    let pb = ProgressBar::new((total_secs.max(0.0) * 1000.0) as u64);

    let term_width = Term::stderr().size().1 as usize;
    let template = if term_width >= 80 {
        "    ⧖ Encoding: {percent:>3}% [{bar:30}] ({elapsed_precise} / {eta_precise})"
    } else {
        "    ⧖ {percent:>3}% [{bar:10}]"
    };
    let style = ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##.");
    pb.set_style(style);

    if !std::io::stderr().is_terminal() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Update the encode progress bar, creating it on first use
pub fn update_progress_bar(elapsed_secs: f64, total_secs: f64) {
    if !std::io::stderr().is_terminal() || total_secs <= 0.0 {
        return;
    }

    if let Ok(mut current) = CURRENT_PROGRESS.lock() {
        let pb = current.get_or_insert_with(|| init_progress_bar(total_secs));
        pb.set_position((elapsed_secs.clamp(0.0, total_secs) * 1000.0) as u64);
    }
}

/// Clear the current progress bar
pub fn clear_progress_bar() {
    if let Ok(mut current) = CURRENT_PROGRESS.lock() {
        if let Some(pb) = current.take() {
            pb.finish_and_clear();
        }
    }
}
