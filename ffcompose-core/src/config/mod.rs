//! Configuration structures and constants for the ffcompose-core library.
//!
//! This module provides the settings handed to the external engine
//! collaborator: where the ffmpeg/ffprobe binaries live, how long a single
//! invocation may run, and the image format used for extracted frames.

mod builder;

use crate::error::{CoreError, CoreResult};

use std::path::PathBuf;
use std::time::Duration;

pub use builder::CoreConfigBuilder;

/// Default image extension for extracted frames.
pub const DEFAULT_FRAME_EXTENSION: &str = "jpg";

/// Sample rate of the audio extraction preset, in Hz.
pub const AUDIO_EXTRACT_FREQUENCY: u32 = 44100;

/// Channel count of the audio extraction preset.
pub const AUDIO_EXTRACT_CHANNELS: u32 = 2;

/// Bitrate of the audio extraction preset, in kb/s.
pub const AUDIO_EXTRACT_BITRATE: u32 = 192;

/// Container format of the audio extraction preset.
pub const AUDIO_EXTRACT_FORMAT: &str = "mp3";

/// Main configuration structure for the ffcompose-core library.
///
/// All fields have sensible defaults. The engine paths default to whatever
/// `ffmpeg-sidecar` resolves, which is the binary next to the current
/// executable if one was downloaded there, or the bare program name looked up
/// on `PATH` otherwise.
///
/// # Examples
///
/// ```rust,no_run
/// use ffcompose_core::config::CoreConfigBuilder;
/// use std::time::Duration;
///
/// let config = CoreConfigBuilder::new()
///     .ffmpeg_path("/usr/local/bin/ffmpeg")
///     .ffprobe_path("/usr/local/bin/ffprobe")
///     .timeout(Duration::from_secs(300))
///     .build();
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// ffmpeg binary used for capability probing and all compiled operations
    pub ffmpeg_path: PathBuf,

    /// ffprobe binary used to produce the per-file report
    pub ffprobe_path: PathBuf,

    /// Wall-clock limit for a single engine invocation (None = unlimited)
    pub timeout: Option<Duration>,

    /// Image extension used by frame extraction
    pub frame_extension: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: ffmpeg_sidecar::paths::ffmpeg_path(),
            ffprobe_path: ffmpeg_sidecar::ffprobe::ffprobe_path(),
            timeout: None,
            frame_extension: DEFAULT_FRAME_EXTENSION.to_string(),
        }
    }
}

impl CoreConfig {
    /// Checks the configuration for values the engine cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.ffmpeg_path.as_os_str().is_empty() {
            return Err(CoreError::Config("ffmpeg path is empty".to_string()));
        }
        if self.ffprobe_path.as_os_str().is_empty() {
            return Err(CoreError::Config("ffprobe path is empty".to_string()));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(CoreError::Config(
                "timeout must be greater than zero".to_string(),
            ));
        }
        let extension = self.frame_extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(CoreError::Config(format!(
                "invalid frame extension '{}'",
                self.frame_extension
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout, None);
        assert_eq!(config.frame_extension, "jpg");
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = CoreConfig {
            timeout: Some(Duration::ZERO),
            ..CoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let config = CoreConfig {
            ffmpeg_path: PathBuf::new(),
            ..CoreConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CoreConfig {
            ffprobe_path: PathBuf::new(),
            ..CoreConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_extension() {
        for extension in ["", ".", "a/b"] {
            let config = CoreConfig {
                frame_extension: extension.to_string(),
                ..CoreConfig::default()
            };
            assert!(config.validate().is_err(), "{extension:?}");
        }
    }
}
