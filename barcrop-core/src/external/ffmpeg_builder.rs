//! FFmpeg command builder utilities
//!
//! Commands are assembled as plain argument lists so that the exact
//! invocation can be logged, inspected by tests, and handed to any
//! [`FfmpegSpawner`](super::FfmpegSpawner) implementation.

use std::fmt;
use std::path::Path;

/// Fully assembled ffmpeg argument list (the program name is not included).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FfmpegInvocation {
    args: Vec<String>,
}

impl FfmpegInvocation {
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Last argument, which is the output target for every command we build.
    pub fn output(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }

    /// True if any argument contains `pattern`.
    pub fn contains(&self, pattern: &str) -> bool {
        self.args.iter().any(|arg| arg.contains(pattern))
    }
}

impl fmt::Display for FfmpegInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ffmpeg {}", self.args.join(" "))
    }
}

/// Builder for creating `FFmpeg` commands with common configurations
pub struct FfmpegCommandBuilder {
    args: Vec<String>,
    hide_banner: bool,
    overwrite: bool,
}

impl Default for FfmpegCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegCommandBuilder {
    /// Creates a new `FFmpeg` command builder with sensible defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            hide_banner: true,
            overwrite: false,
        }
    }

    /// Sets whether to hide the `FFmpeg` banner
    #[must_use]
    pub fn with_hide_banner(mut self, hide: bool) -> Self {
        self.hide_banner = hide;
        self
    }

    /// Overwrite the output file without asking (`-y`)
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Seeks the next input to `secs` (`-ss` placed before `-i`)
    #[must_use]
    pub fn seek(mut self, secs: f64) -> Self {
        self.args.push("-ss".to_string());
        self.args.push(format!("{secs:.3}"));
        self
    }

    #[must_use]
    pub fn input(mut self, path: &Path) -> Self {
        self.args.push("-i".to_string());
        self.args.push(path.to_string_lossy().into_owned());
        self
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Appends the output target and finalizes the argument list
    #[must_use]
    pub fn output(mut self, target: impl Into<String>) -> FfmpegInvocation {
        self.args.push(target.into());

        let mut args = Vec::with_capacity(self.args.len() + 2);
        if self.hide_banner {
            args.push("-hide_banner".to_string());
        }
        if self.overwrite {
            args.push("-y".to_string());
        }
        args.extend(self.args);
        FfmpegInvocation { args }
    }
}
