use anyhow::{Context, Result};
use ffcompose_core::{Transcoder, WatermarkOptions};

use crate::cli::WatermarkArgs;
use crate::output::print_success;

/// Execute the watermark command
pub fn run_watermark(transcoder: &Transcoder, args: &WatermarkArgs) -> Result<()> {
    let options = WatermarkOptions::from(&args.placement);
    let output = transcoder
        .watermark(&args.input, &args.image, args.output.as_deref(), &options)
        .with_context(|| format!("Watermarking {} failed", args.input.display()))?;
    print_success(&format!("Wrote {}", output.display()));
    Ok(())
}
