use anyhow::{Context, Result};
use ffcompose_core::{MediaDescriptor, Transcoder, format_duration};

use crate::cli::InfoArgs;
use crate::output::{print_heading, print_info, print_section};

/// Execute the info command
pub fn run_info(transcoder: &Transcoder, args: &InfoArgs) -> Result<()> {
    let descriptor = transcoder
        .probe_file(&args.input)
        .with_context(|| format!("Failed to probe {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
    } else {
        print_descriptor(&args.input.display().to_string(), &descriptor);
    }
    Ok(())
}

fn print_descriptor(name: &str, descriptor: &MediaDescriptor) {
    print_heading(name);

    print_section("General");
    print_info("Container", &descriptor.video.container);
    print_info(
        "Duration",
        format!(
            "{} ({}s)",
            format_duration(descriptor.duration.seconds),
            descriptor.duration.seconds
        ),
    );
    print_info("Bitrate", format!("{} kb/s", descriptor.video.bitrate));
    print_info("Starts at zero", descriptor.synced);
    if !descriptor.tags.title.is_empty() {
        print_info("Title", &descriptor.tags.title);
    }
    if !descriptor.tags.artist.is_empty() {
        print_info("Artist", &descriptor.tags.artist);
    }

    let video = &descriptor.video;
    print_section("Video");
    print_info("Codec", &video.codec);
    print_info("Resolution", video.resolution);
    if let Some(square) = video.resolution_square {
        print_info("Square pixels", square);
    }
    if let Some(aspect) = &video.aspect {
        print_info("Display aspect", &aspect.string);
    }
    print_info("Pixel aspect", &video.pixel_string);
    print_info("Frame rate", video.fps);
    if video.rotate != 0 {
        print_info("Rotation", video.rotate);
    }

    let audio = &descriptor.audio;
    print_section("Audio");
    print_info("Codec", &audio.codec);
    print_info("Sample rate", format!("{} Hz", audio.sample_rate));
    print_info(
        "Channels",
        format!("{} ({})", audio.channels.raw, audio.channels.value),
    );
    if !audio.bitrate.is_empty() {
        print_info("Bitrate", format!("{} kb/s", audio.bitrate));
    }
}
