use anyhow::{Context, Result};
use ffcompose_core::{FrameExtractionOptions, Transcoder};

use crate::cli::FramesArgs;
use crate::output::print_success;

impl From<&FramesArgs> for FrameExtractionOptions {
    fn from(args: &FramesArgs) -> Self {
        FrameExtractionOptions {
            start_time: args.start.clone(),
            duration_time: args.duration.clone(),
            frame_rate: args.fps,
            size: args.size.clone(),
            number: args.number,
            every_frames: args.every_frames,
            every_seconds: args.every_seconds,
            every_percentage: args.every_percentage,
            keep_pixel_aspect_ratio: !args.geometry.ignore_pixel_aspect,
            keep_aspect_ratio: !args.geometry.ignore_aspect,
            padding_color: args.geometry.padding_color.clone(),
            file_name: args.file_name.clone(),
        }
    }
}

/// Execute the frames command
pub fn run_frames(transcoder: &Transcoder, args: &FramesArgs) -> Result<()> {
    let options = FrameExtractionOptions::from(args);
    let frames = transcoder
        .extract_frames(&args.input, &args.folder, &options)
        .with_context(|| format!("Frame extraction from {} failed", args.input.display()))?;

    for frame in &frames {
        println!("{}", args.folder.join(frame).display());
    }
    print_success(&format!(
        "Extracted {} frame(s) into {}",
        frames.len(),
        args.folder.display()
    ));
    Ok(())
}
