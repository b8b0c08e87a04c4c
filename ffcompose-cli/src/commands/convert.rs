use anyhow::{Context, Result};
use ffcompose_core::{SizeOptions, TranscodeSession, Transcoder, WatermarkOptions};

use crate::cli::ConvertArgs;
use crate::output::print_success;

/// Applies every requested option to the session.
///
/// Setter errors (unsupported codec, malformed size, ...) surface here,
/// before anything is executed.
pub fn apply_options(session: &mut TranscodeSession, args: &ConvertArgs) -> Result<()> {
    if args.no_video {
        session.set_disable_video()?;
    } else {
        if let Some(format) = &args.format {
            session.set_video_format(format)?;
        }
        if let Some(codec) = &args.vcodec {
            session.set_video_codec(codec)?;
        }
        if let Some(kbps) = args.vbitrate {
            session.set_video_bitrate(kbps)?;
        }
        if let Some(fps) = args.fps {
            session.set_video_frame_rate(fps)?;
        }
        if let Some(start) = &args.start {
            session.set_video_start_time(start)?;
        }
        if let Some(duration) = &args.duration {
            session.set_duration(duration)?;
        }
        if let Some(aspect) = &args.aspect {
            session.set_video_aspect_ratio(aspect)?;
        }
        if let Some(size) = &args.size {
            let options = SizeOptions {
                keep_pixel_aspect_ratio: !args.geometry.ignore_pixel_aspect,
                keep_aspect_ratio: !args.geometry.ignore_aspect,
                padding_color: args.geometry.padding_color.clone(),
            };
            session.set_video_size(size, options)?;
        }
        if let Some(image) = &args.watermark {
            session.set_watermark(image, &WatermarkOptions::from(&args.placement))?;
        }
    }

    if args.no_audio {
        session.set_disable_audio()?;
    } else {
        if let Some(codec) = &args.acodec {
            session.set_audio_codec(codec)?;
        }
        if let Some(hz) = args.frequency {
            session.set_audio_frequency(hz)?;
        }
        if let Some(layout) = &args.channels {
            session.set_audio_channels(layout)?;
        }
        if let Some(kbps) = args.abitrate {
            session.set_audio_bitrate(kbps)?;
        }
        if let Some(quality) = args.aquality {
            session.set_audio_quality(quality)?;
        }
    }
    Ok(())
}

/// Execute the convert command
pub fn run_convert(transcoder: &Transcoder, args: &ConvertArgs) -> Result<()> {
    let mut session = transcoder
        .open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    apply_options(&mut session, args)?;

    if args.dry_run {
        let compiled = session.compile(&args.output)?;
        println!("{}", compiled.to_command_line(&transcoder.config().ffmpeg_path));
        return Ok(());
    }

    let output = session
        .save(&args.output)
        .with_context(|| format!("ffmpeg failed to write {}", args.output.display()))?;
    print_success(&format!("Wrote {}", output.display()));
    Ok(())
}
