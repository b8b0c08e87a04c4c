//! Composed operations built on [`TranscodeSession`](crate::session::TranscodeSession).
//!
//! Each preset resets the session, fills it with a fixed sequence of
//! commands, runs it and reports what it produced.

mod audio;
mod frames;
mod watermark;

pub use audio::extract_audio;
pub use frames::{FrameExtractionOptions, extract_frames};
pub use watermark::{default_watermark_output, watermark};
