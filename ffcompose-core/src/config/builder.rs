// ============================================================================
// ffcompose-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of CoreConfig. Every field starts from the defaults of
// CoreConfig::default(), so callers only name what they override.

use std::path::PathBuf;
use std::time::Duration;

use super::CoreConfig;

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use ffcompose_core::config::CoreConfigBuilder;
///
/// let config = CoreConfigBuilder::new()
///     .ffmpeg_path("ffmpeg")
///     .timeout_secs(60)
///     .frame_extension("png")
///     .build();
/// assert_eq!(config.frame_extension, "png");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ffmpeg_path = path.into();
        self
    }

    #[must_use]
    pub fn ffprobe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ffprobe_path = path.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in whole seconds; `0` disables it.
    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    #[must_use]
    pub fn frame_extension(mut self, extension: &str) -> Self {
        self.config.frame_extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Builds the CoreConfig instance.
    #[must_use]
    pub fn build(self) -> CoreConfig {
        self.config
    }
}
