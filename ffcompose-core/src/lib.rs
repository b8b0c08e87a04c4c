//! Core library compiling transform requests into ffmpeg invocations.
//!
//! This crate parses the free-text output of the engine's probe tools into
//! typed records, derives output geometry, and assembles strictly ordered
//! ffmpeg argument vectors from typed session options.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use ffcompose_core::{CoreConfig, SizeOptions, Transcoder};
//! use std::path::Path;
//!
//! let transcoder = Transcoder::new(CoreConfig::default()).unwrap();
//! let mut session = transcoder.open(Path::new("/videos/holiday.mp4")).unwrap();
//!
//! session
//!     .set_video_codec("h264").unwrap()
//!     .set_video_size("640x?", SizeOptions::default()).unwrap()
//!     .set_audio_codec("aac").unwrap();
//!
//! let output = session.save(Path::new("/videos/holiday_small.mp4")).unwrap();
//! println!("wrote {}", output.display());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod external;
pub mod geometry;
pub mod metadata;
pub mod presets;
pub mod session;
pub mod transcoder;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder};
pub use engine::Engine;
pub use error::{CoreError, CoreResult};
pub use external::{
    ExecOptions, FileSystem, ProcessOutput, ProcessRunner, StdFileSystem, SystemRunner,
    check_dependency,
};
pub use geometry::{
    Anchor, AspectRatio, Dimension, Margins, Resolution, SizeSpec, compute_dimension,
    margin_to_overlay, reduce_ratio,
};
pub use metadata::{
    AudioStream, CapabilitySet, MediaDescriptor, VideoStream, parse_capability_set,
    parse_media_descriptor,
};
pub use presets::FrameExtractionOptions;
pub use session::{CompiledCommand, SizeOptions, TranscodeSession, WatermarkOptions};
pub use transcoder::Transcoder;
pub use utils::{duration_to_seconds, format_duration};
