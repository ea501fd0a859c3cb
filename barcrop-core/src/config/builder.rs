// ============================================================================
// barcrop-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of CoreConfig instances. Unset fields keep the defaults
// from config/mod.rs.

use std::path::PathBuf;

use super::{Codecs, CoreConfig};

/// Builder for creating CoreConfig instances.
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    /// Creates a builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_dir(mut self, input_dir: PathBuf) -> Self {
        self.config.input_dir = input_dir;
        self
    }

    pub fn output_dir(mut self, output_dir: PathBuf) -> Self {
        self.config.output_dir = output_dir;
        self
    }

    pub fn temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.config.temp_dir = Some(temp_dir);
        self
    }

    /// Sets the discovery filter. A leading dot is tolerated and removed.
    pub fn video_extension(mut self, extension: &str) -> Self {
        self.config.video_extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn dark_threshold(mut self, threshold: f64) -> Self {
        self.config.dark_threshold = threshold;
        self
    }

    pub fn sample_time_secs(mut self, secs: f64) -> Self {
        self.config.sample_time_secs = secs;
        self
    }

    pub fn end_guard_secs(mut self, secs: f64) -> Self {
        self.config.end_guard_secs = secs;
        self
    }

    pub fn video_codec(mut self, codec: &str) -> Self {
        self.config.codecs.video = codec.to_string();
        self
    }

    pub fn audio_codec(mut self, codec: &str) -> Self {
        self.config.codecs.audio = codec.to_string();
        self
    }

    pub fn codecs(mut self, codecs: Codecs) -> Self {
        self.config.codecs = codecs;
        self
    }

    /// Returns the configured CoreConfig. Call `validate()` on the result
    /// before handing it to the batch runner.
    pub fn build(self) -> CoreConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = CoreConfigBuilder::new()
            .input_dir(PathBuf::from("/videos"))
            .output_dir(PathBuf::from("/videos/cropped"))
            .temp_dir(PathBuf::from("/tmp/barcrop"))
            .video_extension(".MOV")
            .dark_threshold(20.0)
            .sample_time_secs(2.5)
            .end_guard_secs(0.2)
            .video_codec("libx265")
            .audio_codec("libopus")
            .build();

        assert_eq!(config.input_dir, PathBuf::from("/videos"));
        assert_eq!(config.output_dir, PathBuf::from("/videos/cropped"));
        assert_eq!(config.temp_base_dir(), &PathBuf::from("/tmp/barcrop"));
        assert_eq!(config.video_extension, "MOV");
        assert_eq!(config.dark_threshold, 20.0);
        assert_eq!(config.sample_time_secs, 2.5);
        assert_eq!(config.end_guard_secs, 0.2);
        assert_eq!(config.codecs.video, "libx265");
        assert_eq!(config.codecs.audio, "libopus");
        assert!(config.validate().is_ok());
    }
}
