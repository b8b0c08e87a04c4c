//! Probe output parsing.
//!
//! Turns the two free-text blobs printed by the engine into typed records:
//! the [`CapabilitySet`] of the installed ffmpeg build and the
//! [`MediaDescriptor`] of one input file. Both parsers are tolerant and never
//! fail; unrecognized lines are ignored.

mod capabilities;
mod descriptor;

pub use capabilities::{CapabilitySet, parse_capability_set};
pub use descriptor::{
    AudioChannels, AudioStream, MediaDescriptor, MediaDuration, MediaTags, VideoStream,
    parse_media_descriptor,
};
