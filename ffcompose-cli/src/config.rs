// ffcompose-cli/src/config.rs
//
// Maps global CLI flags (and their FFCOMPOSE_* environment fallbacks) onto
// the core configuration.

use crate::cli::Cli;
use ffcompose_core::{CoreConfig, CoreConfigBuilder};

/// Builds the core configuration from the parsed CLI.
///
/// Unset flags keep the core defaults.
pub fn core_config(cli: &Cli) -> CoreConfig {
    let mut builder = CoreConfigBuilder::new();
    if let Some(ffmpeg) = &cli.ffmpeg {
        builder = builder.ffmpeg_path(ffmpeg.clone());
    }
    if let Some(ffprobe) = &cli.ffprobe {
        builder = builder.ffprobe_path(ffprobe.clone());
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout_secs(secs);
    }
    builder.build()
}
