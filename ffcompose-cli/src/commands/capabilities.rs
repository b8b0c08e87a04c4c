use anyhow::{Context, Result};
use ffcompose_core::Transcoder;

use crate::cli::CapabilitiesArgs;
use crate::output::{print_heading, print_info, print_section};

fn joined<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items.into_iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Execute the capabilities command
pub fn run_capabilities(transcoder: &Transcoder, args: &CapabilitiesArgs) -> Result<()> {
    let capabilities = transcoder
        .probe_capabilities()
        .context("Failed to query ffmpeg capabilities")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&capabilities)?);
        return Ok(());
    }

    print_heading("ffmpeg capabilities");
    print_info("Binary", transcoder.config().ffmpeg_path.display());
    print_section("Enabled modules");
    println!("  {}", joined(&capabilities.modules));
    print_section("Formats");
    print_info("Decode", capabilities.decode.len());
    print_info("Encode", capabilities.encode.len());
    println!("  {}", joined(&capabilities.encode));
    Ok(())
}
