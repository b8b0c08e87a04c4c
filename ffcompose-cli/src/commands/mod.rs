//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

pub mod audio;
pub mod capabilities;
pub mod convert;
pub mod frames;
pub mod info;
pub mod watermark;

use anyhow::{Result, bail};
use ffcompose_core::{CoreConfig, Margins, WatermarkOptions, check_dependency};
use std::path::Path;

use crate::cli::PlacementArgs;

/// Fails early with a readable message when `input` is missing.
pub fn ensure_input(input: &Path) -> Result<()> {
    if !input.is_file() {
        bail!("Input file not found: {}", input.display());
    }
    Ok(())
}

/// Checks that both engine binaries can be started.
pub fn ensure_engine(config: &CoreConfig) -> Result<()> {
    check_dependency(&config.ffmpeg_path)?;
    check_dependency(&config.ffprobe_path)?;
    Ok(())
}

impl From<&PlacementArgs> for WatermarkOptions {
    fn from(args: &PlacementArgs) -> Self {
        WatermarkOptions {
            position: args.position,
            margins: Margins {
                top: args.margin_top,
                bottom: args.margin_bottom,
                left: args.margin_left,
                right: args.margin_right,
            },
        }
    }
}
