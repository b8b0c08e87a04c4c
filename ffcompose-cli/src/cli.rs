// ffcompose-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use ffcompose_core::Anchor;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "ffcompose: ffmpeg command compiler",
    long_about = "Probes media files and compiles resize, watermark, frame and audio extraction requests into ffmpeg invocations."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (compiled command lines, parsed probe summaries)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Also write log output to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// ffmpeg binary to use
    #[arg(long, global = true, value_name = "PATH", env = "FFCOMPOSE_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// ffprobe binary to use
    #[arg(long, global = true, value_name = "PATH", env = "FFCOMPOSE_FFPROBE")]
    pub ffprobe: Option<PathBuf>,

    /// Kill an engine invocation after this many seconds (0 = no limit)
    #[arg(long, global = true, value_name = "SECONDS", env = "FFCOMPOSE_TIMEOUT")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prints the parsed media descriptor of a file
    Info(InfoArgs),
    /// Prints the modules and formats of the installed ffmpeg
    Capabilities(CapabilitiesArgs),
    /// Transcodes a file with the given video/audio options
    Convert(ConvertArgs),
    /// Extracts still frames into a folder
    Frames(FramesArgs),
    /// Extracts the audio track as mp3
    Audio(AudioArgs),
    /// Overlays a watermark image
    Watermark(WatermarkArgs),
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Media file to probe
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Print the descriptor as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CapabilitiesArgs {
    /// Print the capability set as JSON
    #[arg(long)]
    pub json: bool,
}

/// Watermark placement shared by `convert` and `watermark`.
#[derive(Args, Debug, Clone, Default)]
pub struct PlacementArgs {
    /// Anchor: NE, NC, NW, SE, SC, SW, C, CE or CW
    #[arg(long, value_name = "ANCHOR", default_value = "SW", value_parser = parse_anchor)]
    pub position: Anchor,

    #[arg(long, value_name = "PX", default_value_t = 0, allow_negative_numbers = true)]
    pub margin_top: i32,

    #[arg(long, value_name = "PX", default_value_t = 0, allow_negative_numbers = true)]
    pub margin_bottom: i32,

    #[arg(long, value_name = "PX", default_value_t = 0, allow_negative_numbers = true)]
    pub margin_left: i32,

    #[arg(long, value_name = "PX", default_value_t = 0, allow_negative_numbers = true)]
    pub margin_right: i32,
}

/// Geometry handling shared by `convert` and `frames`.
#[derive(Args, Debug, Clone)]
pub struct GeometryArgs {
    /// Do not correct for non-square source pixels
    #[arg(long)]
    pub ignore_pixel_aspect: bool,

    /// Do not letterbox to the output aspect ratio
    #[arg(long)]
    pub ignore_aspect: bool,

    /// Letterbox padding color
    #[arg(long, value_name = "COLOR", default_value = "black")]
    pub padding_color: String,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Source media file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    // --- Video ---
    /// Output container format (-f)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Video codec (-vcodec)
    #[arg(long, value_name = "CODEC")]
    pub vcodec: Option<String>,

    /// Video bitrate in kb/s
    #[arg(long, value_name = "KBPS")]
    pub vbitrate: Option<u32>,

    /// Output frame rate
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f64>,

    /// Start offset (HH:MM:SS or seconds)
    #[arg(long, value_name = "TIME")]
    pub start: Option<String>,

    /// Duration (HH:MM:SS or seconds)
    #[arg(long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Display aspect ratio (X:Y or a number)
    #[arg(long, value_name = "RATIO")]
    pub aspect: Option<String>,

    /// Output size: WxH, Wx?, ?xH or N%
    #[arg(long, value_name = "SIZE")]
    pub size: Option<String>,

    #[command(flatten)]
    pub geometry: GeometryArgs,

    /// Watermark image overlaid on the output
    #[arg(long, value_name = "IMAGE")]
    pub watermark: Option<PathBuf>,

    #[command(flatten)]
    pub placement: PlacementArgs,

    /// Drop the video stream
    #[arg(long, conflicts_with_all = [
        "format", "vcodec", "vbitrate", "fps", "start", "duration", "aspect", "size",
        "ignore_pixel_aspect", "ignore_aspect", "padding_color",
        "watermark", "position", "margin_top", "margin_bottom", "margin_left", "margin_right",
    ])]
    pub no_video: bool,

    // --- Audio ---
    /// Audio codec (-acodec)
    #[arg(long, value_name = "CODEC")]
    pub acodec: Option<String>,

    /// Audio sample rate in Hz
    #[arg(long, value_name = "HZ")]
    pub frequency: Option<u32>,

    /// Channel layout (mono, stereo, 2.1, quad, 5.0, 5.1, 6.1, 7.1)
    #[arg(long, value_name = "LAYOUT")]
    pub channels: Option<String>,

    /// Audio bitrate in kb/s
    #[arg(long, value_name = "KBPS")]
    pub abitrate: Option<u32>,

    /// Audio quality (-aq)
    #[arg(long, value_name = "Q")]
    pub aquality: Option<f64>,

    /// Drop the audio stream
    #[arg(long, conflicts_with_all = ["acodec", "frequency", "channels", "abitrate", "aquality"])]
    pub no_audio: bool,

    /// Print the compiled ffmpeg command instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct FramesArgs {
    /// Source media file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Folder receiving the frames (created if missing)
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Start offset (HH:MM:SS or seconds)
    #[arg(long, value_name = "TIME")]
    pub start: Option<String>,

    /// Duration (HH:MM:SS or seconds)
    #[arg(long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Frame rate of the extraction
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f64>,

    /// Frame size: WxH, Wx?, ?xH or N% (defaults to the source size)
    #[arg(long, value_name = "SIZE")]
    pub size: Option<String>,

    /// Maximum number of frames
    #[arg(long, value_name = "COUNT")]
    pub number: Option<u32>,

    /// Keep one frame every N frames
    #[arg(long, value_name = "N")]
    pub every_frames: Option<u32>,

    /// Keep one frame every N seconds
    #[arg(long, value_name = "N")]
    pub every_seconds: Option<u32>,

    /// Keep one frame every N percent of the duration
    #[arg(long, value_name = "PERCENT")]
    pub every_percentage: Option<u32>,

    #[command(flatten)]
    pub geometry: GeometryArgs,

    /// File name template (%t timestamp, %s size, %x width, %y height)
    #[arg(long, value_name = "TEMPLATE")]
    pub file_name: Option<String>,
}

#[derive(Args, Debug)]
pub struct AudioArgs {
    /// Source media file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination mp3 file (replaced if it exists)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct WatermarkArgs {
    /// Source media file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Watermark image
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Destination (defaults to <input>_watermarked_<image>.<ext> next to the input)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub placement: PlacementArgs,
}

fn parse_anchor(value: &str) -> Result<Anchor, String> {
    value.to_ascii_uppercase().parse().map_err(|e: ffcompose_core::CoreError| e.to_string())
}
