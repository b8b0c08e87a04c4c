// ffcompose-cli/src/lib.rs
//
// Library portion of the ffcompose CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{
    AudioArgs, CapabilitiesArgs, Cli, Commands, ConvertArgs, FramesArgs, InfoArgs, WatermarkArgs,
};
pub use commands::audio::run_audio;
pub use commands::capabilities::run_capabilities;
pub use commands::convert::run_convert;
pub use commands::frames::run_frames;
pub use commands::info::run_info;
pub use commands::watermark::run_watermark;
