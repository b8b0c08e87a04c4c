//! Typed option records accumulated by a [`TranscodeSession`](super::TranscodeSession).

use crate::error::{CoreError, CoreResult};
use crate::geometry::{Anchor, Margins, SizeSpec};

use std::path::PathBuf;

/// Channel layout names accepted by `set_audio_channels`.
pub const AUDIO_CHANNEL_LAYOUTS: [(&str, u32); 8] = [
    ("mono", 1),
    ("stereo", 2),
    ("2.1", 3),
    ("quad", 4),
    ("5.0", 5),
    ("5.1", 6),
    ("6.1", 7),
    ("7.1", 8),
];

/// Looks up the channel count of a named layout.
pub fn channel_count(layout: &str) -> CoreResult<u32> {
    AUDIO_CHANNEL_LAYOUTS
        .iter()
        .find(|(name, _)| *name == layout)
        .map(|(_, count)| *count)
        .ok_or_else(|| CoreError::InvalidAudioChannel(layout.to_string()))
}

/// Geometry options of a size request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeOptions {
    pub keep_pixel_aspect_ratio: bool,
    pub keep_aspect_ratio: bool,
    pub padding_color: String,
}

impl Default for SizeOptions {
    fn default() -> Self {
        Self {
            keep_pixel_aspect_ratio: true,
            keep_aspect_ratio: true,
            padding_color: "black".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeRequest {
    pub spec: SizeSpec,
    pub options: SizeOptions,
}

/// Placement of a watermark image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatermarkOptions {
    pub position: Anchor,
    pub margins: Margins,
}

/// A validated watermark: source image plus overlay coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkOverlay {
    pub path: PathBuf,
    pub overlay: String,
}

impl WatermarkOverlay {
    #[must_use]
    pub fn filter(&self) -> String {
        format!("overlay={}", self.overlay)
    }
}

/// Video options; `None` fields are not emitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoOptions {
    pub disabled: bool,
    pub format: Option<String>,
    pub codec: Option<String>,
    /// kb/s
    pub bitrate: Option<u32>,
    pub frame_rate: Option<f64>,
    /// Seconds; zero is not emitted.
    pub start_time: Option<u64>,
    /// Seconds; zero is not emitted.
    pub duration: Option<u64>,
    pub aspect: Option<String>,
    pub size: Option<SizeRequest>,
    pub watermark: Option<WatermarkOverlay>,
}

/// Audio options; `None` fields are not emitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioOptions {
    pub disabled: bool,
    pub codec: Option<String>,
    /// Hz
    pub frequency: Option<u32>,
    pub channels: Option<u32>,
    /// kb/s
    pub bitrate: Option<u32>,
    pub quality: Option<f64>,
}
