use anyhow::{Context, Result};
use ffcompose_core::Transcoder;

use crate::cli::AudioArgs;
use crate::output::print_success;

/// Execute the audio command
pub fn run_audio(transcoder: &Transcoder, args: &AudioArgs) -> Result<()> {
    let output = transcoder
        .extract_audio(&args.input, &args.output)
        .with_context(|| format!("Audio extraction from {} failed", args.input.display()))?;
    print_success(&format!("Wrote {}", output.display()));
    Ok(())
}
