// ffcompose-cli/src/main.rs
//
// Entry point of the ffcompose binary.
//
// Responsibilities include:
// - Parsing user-provided arguments.
// - Setting up logging to the console and an optional file.
// - Validating inputs and the presence of ffmpeg/ffprobe.
// - Building the core configuration and the Transcoder.
// - Dispatching to the command implementations and mapping errors to the
//   process exit code.

use anyhow::{Context, Result};
use clap::Parser;
use ffcompose_cli::commands::{ensure_engine, ensure_input};
use ffcompose_cli::config::core_config;
use ffcompose_cli::{
    Cli, Commands, logging, run_audio, run_capabilities, run_convert, run_frames, run_info,
    run_watermark,
};
use ffcompose_core::Transcoder;
use std::process;

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Info(args) => ensure_input(&args.input)?,
        Commands::Convert(args) => ensure_input(&args.input)?,
        Commands::Frames(args) => ensure_input(&args.input)?,
        Commands::Audio(args) => ensure_input(&args.input)?,
        Commands::Watermark(args) => {
            ensure_input(&args.input)?;
            ensure_input(&args.image)?;
        }
        Commands::Capabilities(_) => {}
    }

    let config = core_config(&cli);
    ensure_engine(&config)?;
    let transcoder = Transcoder::new(config).context("Invalid configuration")?;

    match &cli.command {
        Commands::Info(args) => run_info(&transcoder, args),
        Commands::Capabilities(args) => run_capabilities(&transcoder, args),
        Commands::Convert(args) => run_convert(&transcoder, args),
        Commands::Frames(args) => run_frames(&transcoder, args),
        Commands::Audio(args) => run_audio(&transcoder, args),
        Commands::Watermark(args) => run_watermark(&transcoder, args),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{e:#}");
        process::exit(1);
    }
}
