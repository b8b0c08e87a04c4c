// ============================================================================
// ffcompose-core/src/session/mod.rs
// ============================================================================
//
// TRANSCODE SESSION: Typed Options Compiled into an Engine Command
//
// A session belongs to one opened source file. Setters validate eagerly
// against the capability set and the media descriptor, then record typed
// options. `compile` turns the recorded options plus any raw commands,
// inputs and filter fragments into a CompiledCommand without touching the
// session, so a validation failure never leaves partial state behind.
//
// Video flags are emitted in a fixed order (-f, -vcodec, -b, -r, -ss, -t,
// watermark overlay, aspect pad + -aspect, -s), then audio flags (-acodec,
// -ar, -ac, -aq, -ab).

mod command;
mod options;

pub use command::{CommandLine, CompiledCommand, FilterGraph};
pub use options::{
    AUDIO_CHANNEL_LAYOUTS, AudioOptions, SizeOptions, SizeRequest, VideoOptions,
    WatermarkOptions, WatermarkOverlay, channel_count,
};

use crate::engine::Engine;
use crate::error::{CoreError, CoreResult};
use crate::geometry::{SizeSpec, aspect_pad_filter, compute_dimension, margin_to_overlay};
use crate::metadata::{CapabilitySet, MediaDescriptor};
use crate::utils::duration_to_seconds;

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static ASPECT_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+):(\d+)\s*$").expect("valid regex"));

/// Accumulates options for one engine invocation against one source file.
#[derive(Debug, Clone)]
pub struct TranscodeSession {
    file_path: PathBuf,
    capabilities: Arc<CapabilitySet>,
    descriptor: Arc<MediaDescriptor>,
    engine: Engine,
    video: VideoOptions,
    audio: AudioOptions,
    commands: CommandLine,
    inputs: Vec<PathBuf>,
    filters: FilterGraph,
    output: Option<PathBuf>,
}

impl TranscodeSession {
    pub fn new(
        file_path: impl Into<PathBuf>,
        capabilities: Arc<CapabilitySet>,
        descriptor: Arc<MediaDescriptor>,
        engine: Engine,
    ) -> Self {
        let file_path = file_path.into();
        Self {
            inputs: vec![file_path.clone()],
            file_path,
            capabilities,
            descriptor,
            engine,
            video: VideoOptions::default(),
            audio: AudioOptions::default(),
            commands: CommandLine::new(),
            filters: FilterGraph::new(),
            output: None,
        }
    }

    // ---- Accessors ----

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    #[must_use]
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    #[must_use]
    pub fn descriptor(&self) -> &MediaDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[must_use]
    pub fn video_options(&self) -> &VideoOptions {
        &self.video
    }

    #[must_use]
    pub fn audio_options(&self) -> &AudioOptions {
        &self.audio
    }

    #[must_use]
    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    #[must_use]
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    // ---- Raw surface ----

    /// Appends a raw flag; a flag already present fails with `DuplicateCommand`.
    pub fn add_command(&mut self, flag: &str, argument: Option<&str>) -> CoreResult<&mut Self> {
        self.commands.push(flag, argument.map(str::to_string))?;
        Ok(self)
    }

    pub fn add_input(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.inputs.push(path.into());
        self
    }

    pub fn add_filter(&mut self, fragment: impl Into<String>) -> &mut Self {
        self.filters.add(fragment);
        self
    }

    pub fn set_output(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.output = Some(path.into());
        self
    }

    /// Clears everything except the source file, which stays the first input.
    pub fn reset(&mut self) -> &mut Self {
        self.video = VideoOptions::default();
        self.audio = AudioOptions::default();
        self.commands.clear();
        self.inputs = vec![self.file_path.clone()];
        self.filters.clear();
        self.output = None;
        self
    }

    // ---- Video setters ----

    pub fn set_video_format(&mut self, format: &str) -> CoreResult<&mut Self> {
        if !self.capabilities.can_encode(format) {
            return Err(CoreError::FormatNotSupported(format.to_string()));
        }
        self.video.format = Some(format.to_string());
        Ok(self)
    }

    pub fn set_video_codec(&mut self, codec: &str) -> CoreResult<&mut Self> {
        if !self.capabilities.can_encode(codec) {
            return Err(CoreError::CodecNotSupported(codec.to_string()));
        }
        self.video.codec = Some(codec.to_string());
        Ok(self)
    }

    /// A zero bitrate is recorded but not emitted.
    pub fn set_video_bitrate(&mut self, kbps: u32) -> CoreResult<&mut Self> {
        self.video.bitrate = Some(kbps);
        Ok(self)
    }

    /// A zero rate is recorded but not emitted.
    pub fn set_video_frame_rate(&mut self, fps: f64) -> CoreResult<&mut Self> {
        if !fps.is_finite() || fps < 0.0 {
            return Err(CoreError::InvalidFrameRate(fps));
        }
        self.video.frame_rate = Some(fps);
        Ok(self)
    }

    /// Accepts `HH:MM:SS` or whole seconds; anything else counts as zero.
    pub fn set_video_start_time(&mut self, time: &str) -> CoreResult<&mut Self> {
        self.video.start_time = Some(duration_to_seconds(time, 0));
        Ok(self)
    }

    pub fn set_duration(&mut self, duration: &str) -> CoreResult<&mut Self> {
        self.video.duration = Some(duration_to_seconds(duration, 0));
        Ok(self)
    }

    /// Accepts an `X:Y` literal or a plain number, and otherwise falls back
    /// to the source's display aspect.
    pub fn set_video_aspect_ratio(&mut self, ratio: &str) -> CoreResult<&mut Self> {
        let trimmed = ratio.trim();
        let literal = ASPECT_LITERAL
            .captures(trimmed)
            .filter(|caps| &caps[1] != "0" && &caps[2] != "0")
            .map(|_| trimmed.to_string());
        let numeric = || {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(|_| trimmed.to_string())
        };
        let aspect = literal
            .or_else(numeric)
            .or_else(|| self.descriptor.video.aspect.as_ref().map(|a| a.string.clone()))
            .ok_or_else(|| CoreError::InvalidAspect(ratio.to_string()))?;
        self.video.aspect = Some(aspect);
        Ok(self)
    }

    pub fn set_video_size(&mut self, size: &str, options: SizeOptions) -> CoreResult<&mut Self> {
        let spec = SizeSpec::parse(size)?;
        self.video.size = Some(SizeRequest { spec, options });
        Ok(self)
    }

    pub fn set_disable_video(&mut self) -> CoreResult<&mut Self> {
        self.video.disabled = true;
        Ok(self)
    }

    fn watermark_overlay(&self, path: &Path, options: &WatermarkOptions) -> CoreResult<WatermarkOverlay> {
        if !self.engine.fs().exists(path) {
            return Err(CoreError::InvalidWatermark(path.to_path_buf()));
        }
        Ok(WatermarkOverlay {
            path: path.to_path_buf(),
            overlay: margin_to_overlay(options.position, &options.margins),
        })
    }

    /// Records a watermark; its input and overlay are added at compile time.
    pub fn set_watermark(&mut self, path: &Path, options: &WatermarkOptions) -> CoreResult<&mut Self> {
        let overlay = self.watermark_overlay(path, options)?;
        self.video.watermark = Some(overlay);
        Ok(self)
    }

    /// Adds the watermark input and overlay fragment immediately.
    pub fn overlay_watermark(&mut self, path: &Path, options: &WatermarkOptions) -> CoreResult<&mut Self> {
        let overlay = self.watermark_overlay(path, options)?;
        self.filters.add(overlay.filter());
        self.inputs.push(overlay.path);
        Ok(self)
    }

    // ---- Audio setters ----

    /// `mp3` is replaced by `libmp3lame` when that module is enabled.
    pub fn set_audio_codec(&mut self, codec: &str) -> CoreResult<&mut Self> {
        if !self.capabilities.can_encode(codec) {
            return Err(CoreError::CodecNotSupported(codec.to_string()));
        }
        let codec = if codec == "mp3" && self.capabilities.has_module("libmp3lame") {
            "libmp3lame"
        } else {
            codec
        };
        self.audio.codec = Some(codec.to_string());
        Ok(self)
    }

    pub fn set_audio_frequency(&mut self, hz: u32) -> CoreResult<&mut Self> {
        self.audio.frequency = Some(hz);
        Ok(self)
    }

    pub fn set_audio_channels(&mut self, layout: &str) -> CoreResult<&mut Self> {
        self.audio.channels = Some(channel_count(layout)?);
        Ok(self)
    }

    pub fn set_audio_bitrate(&mut self, kbps: u32) -> CoreResult<&mut Self> {
        self.audio.bitrate = Some(kbps);
        Ok(self)
    }

    pub fn set_audio_quality(&mut self, quality: f64) -> CoreResult<&mut Self> {
        self.audio.quality = Some(quality);
        Ok(self)
    }

    pub fn set_disable_audio(&mut self) -> CoreResult<&mut Self> {
        self.audio.disabled = true;
        Ok(self)
    }

    // ---- Compilation ----

    fn compile_video(
        &self,
        commands: &mut CommandLine,
        inputs: &mut Vec<PathBuf>,
        filters: &mut FilterGraph,
    ) -> CoreResult<()> {
        let video = &self.video;
        if video.disabled {
            return commands.push("-vn", None);
        }

        if let Some(format) = &video.format {
            commands.push("-f", Some(format.clone()))?;
        }
        if let Some(codec) = &video.codec {
            commands.push("-vcodec", Some(codec.clone()))?;
        }
        if let Some(bitrate) = video.bitrate.filter(|b| *b > 0) {
            commands.push("-b", Some(format!("{bitrate}k")))?;
        }
        if let Some(frame_rate) = video.frame_rate.filter(|r| *r > 0.0) {
            commands.push("-r", Some(frame_rate.to_string()))?;
        }
        if let Some(start) = video.start_time.filter(|s| *s > 0) {
            commands.push("-ss", Some(start.to_string()))?;
        }
        if let Some(duration) = video.duration.filter(|d| *d > 0) {
            commands.push("-t", Some(duration.to_string()))?;
        }

        if let Some(watermark) = &video.watermark {
            inputs.push(watermark.path.clone());
            filters.add(watermark.filter());
        }

        if let Some(size) = &video.size {
            let dimension = compute_dimension(
                &self.descriptor.video,
                size.spec,
                size.options.keep_pixel_aspect_ratio,
                size.options.keep_aspect_ratio,
            )?;
            if let Some(aspect) = &dimension.aspect {
                filters.add(aspect_pad_filter(aspect, Some(&size.options.padding_color)));
                commands.push("-aspect", Some(aspect.string.clone()))?;
            }
            commands.push("-s", Some(format!("{}x{}", dimension.width, dimension.height)))?;
        }

        if let Some(aspect) = &video.aspect {
            if !commands.contains("-aspect") {
                commands.push("-aspect", Some(aspect.clone()))?;
            }
        }
        Ok(())
    }

    fn compile_audio(&self, commands: &mut CommandLine) -> CoreResult<()> {
        let audio = &self.audio;
        if audio.disabled {
            return commands.push("-an", None);
        }

        if let Some(codec) = &audio.codec {
            commands.push("-acodec", Some(codec.clone()))?;
        }
        if let Some(frequency) = audio.frequency.filter(|f| *f > 0) {
            commands.push("-ar", Some(frequency.to_string()))?;
        }
        if let Some(channels) = audio.channels {
            commands.push("-ac", Some(channels.to_string()))?;
        }
        if let Some(quality) = audio.quality {
            commands.push("-aq", Some(quality.to_string()))?;
        }
        if let Some(bitrate) = audio.bitrate.filter(|b| *b > 0) {
            commands.push("-ab", Some(format!("{bitrate}k")))?;
        }
        Ok(())
    }

    /// Compiles the session into an argument vector writing to `destination`.
    ///
    /// The session is not modified.
    pub fn compile(&self, destination: &Path) -> CoreResult<CompiledCommand> {
        let mut commands = self.commands.clone();
        let mut inputs = self.inputs.clone();
        let mut filters = self.filters.clone();

        self.compile_video(&mut commands, &mut inputs, &mut filters)?;
        self.compile_audio(&mut commands)?;

        let compiled = CompiledCommand::assemble(&inputs, &commands, &filters, destination);
        log::debug!(
            "Compiled command: {}",
            compiled.to_command_line(&self.engine.config().ffmpeg_path)
        );
        Ok(compiled)
    }

    /// Compiles against the output set with [`set_output`](Self::set_output).
    pub fn compile_to_output(&self) -> CoreResult<CompiledCommand> {
        let output = self
            .output
            .as_deref()
            .ok_or_else(|| CoreError::PathError("no output path set".to_string()))?;
        self.compile(output)
    }

    /// Compiles, runs the engine, then resets the session.
    ///
    /// Returns the destination. On failure the session is left as it was.
    pub fn save(&mut self, destination: &Path) -> CoreResult<PathBuf> {
        let compiled = self.compile(destination)?;
        self.engine.run(&compiled)?;
        self.reset();
        Ok(compiled.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfigBuilder;
    use crate::external::mocks::{MockFileSystem, MockRunner};
    use crate::geometry::{Anchor, AspectRatio, Margins, Resolution};
    use crate::metadata::{VideoStream, parse_capability_set};

    const CAPABILITIES: &str = "\
  configuration: --enable-gpl --enable-libmp3lame --enable-libx264
File formats:
 D. = Demuxing supported
 .E = Muxing supported
 --
 DE matroska,webm        Matroska / WebM
 E  mp4                  MP4 (MPEG-4 Part 14)
 DE mp3                  MP3 (MPEG audio layer 3)
 E  h264                 raw H.264 video
 DE aac                  raw ADTS AAC
";

    fn descriptor(w: u32, h: u32) -> MediaDescriptor {
        let mut descriptor = MediaDescriptor::default();
        descriptor.video = VideoStream {
            resolution: Resolution::new(w, h),
            aspect: AspectRatio::from_dimensions(w, h).ok(),
            pixel: 1.0,
            pixel_string: "1:1".to_string(),
            ..VideoStream::default()
        };
        descriptor.duration.seconds = 30;
        descriptor
    }

    fn session_with(fs: MockFileSystem, runner: MockRunner) -> TranscodeSession {
        let config = CoreConfigBuilder::new()
            .ffmpeg_path("ffmpeg")
            .ffprobe_path("ffprobe")
            .build();
        let engine = Engine::new(config, Arc::new(runner), Arc::new(fs));
        TranscodeSession::new(
            "/media/in.mp4",
            Arc::new(parse_capability_set(CAPABILITIES)),
            Arc::new(descriptor(1280, 720)),
            engine,
        )
    }

    fn session() -> TranscodeSession {
        session_with(MockFileSystem::new(), MockRunner::new())
    }

    fn out() -> &'static Path {
        Path::new("/media/out.mp4")
    }

    #[test]
    fn test_empty_session_compiles_to_input_and_output() {
        let compiled = session().compile(out()).unwrap();
        assert_eq!(compiled.args, ["-i", "/media/in.mp4", "/media/out.mp4"]);
    }

    #[test]
    fn test_video_flags_in_fixed_order() {
        let mut session = session();
        session
            .set_duration("00:00:10")
            .unwrap()
            .set_video_start_time("5")
            .unwrap()
            .set_video_frame_rate(25.0)
            .unwrap()
            .set_video_bitrate(800)
            .unwrap()
            .set_video_codec("h264")
            .unwrap()
            .set_video_format("mp4")
            .unwrap();

        let compiled = session.compile(out()).unwrap();
        assert_eq!(
            compiled.args,
            [
                "-i", "/media/in.mp4", "-f", "mp4", "-vcodec", "h264", "-b", "800k", "-r", "25",
                "-ss", "5", "-t", "10", "/media/out.mp4"
            ]
        );
    }

    #[test]
    fn test_zero_start_and_duration_are_not_emitted() {
        let mut session = session();
        session.set_video_start_time("garbage").unwrap();
        session.set_duration("0").unwrap();
        let compiled = session.compile(out()).unwrap();
        assert!(!compiled.args.contains(&"-ss".to_string()));
        assert!(!compiled.args.contains(&"-t".to_string()));
    }

    #[test]
    fn test_zero_rates_are_not_emitted() {
        let mut session = session();
        session
            .set_video_bitrate(0)
            .unwrap()
            .set_video_frame_rate(0.0)
            .unwrap()
            .set_audio_bitrate(0)
            .unwrap()
            .set_audio_frequency(0)
            .unwrap();
        let compiled = session.compile(out()).unwrap();
        assert_eq!(compiled.args, ["-i", "/media/in.mp4", "/media/out.mp4"]);
    }

    #[test]
    fn test_invalid_frame_rate_is_rejected() {
        let mut session = session();
        for rate in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                session.set_video_frame_rate(rate),
                Err(CoreError::InvalidFrameRate(_))
            ));
        }
        assert_eq!(session.video_options().frame_rate, None);
    }

    #[test]
    fn test_unsupported_codec_and_format() {
        let mut session = session();
        assert!(matches!(
            session.set_video_codec("vp9"),
            Err(CoreError::CodecNotSupported(codec)) if codec == "vp9"
        ));
        assert!(matches!(
            session.set_video_format("avi"),
            Err(CoreError::FormatNotSupported(format)) if format == "avi"
        ));
        assert!(matches!(
            session.set_audio_codec("opus"),
            Err(CoreError::CodecNotSupported(_))
        ));
        assert_eq!(session.video_options(), &VideoOptions::default());
    }

    #[test]
    fn test_mp3_remapped_when_module_enabled() {
        let mut session = session();
        session.set_audio_codec("mp3").unwrap();
        let compiled = session.compile(out()).unwrap();
        let position = compiled.args.iter().position(|a| a == "-acodec").unwrap();
        assert_eq!(compiled.args[position + 1], "libmp3lame");
    }

    #[test]
    fn test_mp3_kept_without_module() {
        let mut session = session();
        session.capabilities = Arc::new(parse_capability_set(" DE mp3    MP3\n"));
        session.set_audio_codec("mp3").unwrap();
        assert_eq!(session.audio_options().codec.as_deref(), Some("mp3"));
    }

    #[test]
    fn test_audio_flags_in_fixed_order() {
        let mut session = session();
        session
            .set_audio_bitrate(128)
            .unwrap()
            .set_audio_quality(2.0)
            .unwrap()
            .set_audio_channels("5.1")
            .unwrap()
            .set_audio_frequency(48000)
            .unwrap()
            .set_audio_codec("aac")
            .unwrap();
        let compiled = session.compile(out()).unwrap();
        assert_eq!(
            &compiled.args[2..12],
            ["-acodec", "aac", "-ar", "48000", "-ac", "6", "-aq", "2", "-ab", "128k"]
        );
    }

    #[test]
    fn test_invalid_audio_channel() {
        assert!(matches!(
            session().set_audio_channels("9.2"),
            Err(CoreError::InvalidAudioChannel(layout)) if layout == "9.2"
        ));
    }

    #[test]
    fn test_disabled_streams_emit_only_disable_flags() {
        let mut session = session();
        session.set_video_codec("h264").unwrap().set_disable_video().unwrap();
        session.set_audio_codec("aac").unwrap().set_disable_audio().unwrap();
        let compiled = session.compile(out()).unwrap();
        assert_eq!(compiled.args, ["-i", "/media/in.mp4", "-vn", "-an", "/media/out.mp4"]);
    }

    #[test]
    fn test_size_with_aspect_emits_pad_and_aspect() {
        let mut session = session();
        session.set_video_size("640x?", SizeOptions::default()).unwrap();
        let compiled = session.compile(out()).unwrap();
        let len = compiled.args.len();
        assert_eq!(
            &compiled.args[2..],
            [
                "-aspect",
                "16:9",
                "-s",
                "640x360",
                "-filter_complex",
                "scale=iw*sar:ih,pad=max(iw\\,ih*(16/9)):ow/(16/9):(ow-iw)/2:(oh-ih)/2:black",
                "/media/out.mp4"
            ]
        );
        assert_eq!(compiled.args[len - 1], "/media/out.mp4");
    }

    #[test]
    fn test_size_without_keep_aspect() {
        let mut session = session();
        let options = SizeOptions {
            keep_aspect_ratio: false,
            ..SizeOptions::default()
        };
        session.set_video_size("50%", options).unwrap();
        let compiled = session.compile(out()).unwrap();
        assert_eq!(compiled.args[2..], ["-s", "640x360", "/media/out.mp4"]);
    }

    #[test]
    fn test_malformed_size_fails_eagerly() {
        let mut session = session();
        assert!(matches!(
            session.set_video_size("wide", SizeOptions::default()),
            Err(CoreError::SizeFormat(_))
        ));
        assert!(session.video_options().size.is_none());
    }

    #[test]
    fn test_explicit_aspect_only_when_size_did_not_emit_one() {
        let mut session = session();
        session.set_video_aspect_ratio("4:3").unwrap();
        let compiled = session.compile(out()).unwrap();
        assert_eq!(compiled.args[2..], ["-aspect", "4:3", "/media/out.mp4"]);

        session.set_video_size("640x?", SizeOptions::default()).unwrap();
        let compiled = session.compile(out()).unwrap();
        let aspects: Vec<_> = compiled.args.iter().filter(|a| *a == "-aspect").collect();
        assert_eq!(aspects.len(), 1);
    }

    #[test]
    fn test_aspect_ratio_fallbacks() {
        let mut session = session();
        session.set_video_aspect_ratio("1.85").unwrap();
        assert_eq!(session.video_options().aspect.as_deref(), Some("1.85"));

        session.set_video_aspect_ratio("cinema").unwrap();
        assert_eq!(session.video_options().aspect.as_deref(), Some("16:9"));

        let mut bare = session_with(MockFileSystem::new(), MockRunner::new());
        bare.descriptor = Arc::new(MediaDescriptor::default());
        assert!(matches!(
            bare.set_video_aspect_ratio("cinema"),
            Err(CoreError::InvalidAspect(_))
        ));
    }

    #[test]
    fn test_watermark_requires_existing_source() {
        let mut session = session();
        let result = session.set_watermark(Path::new("/media/logo.png"), &WatermarkOptions::default());
        assert!(matches!(result, Err(CoreError::InvalidWatermark(path)) if path == Path::new("/media/logo.png")));
    }

    #[test]
    fn test_deferred_watermark_added_at_compile() {
        let fs = MockFileSystem::with_files(["/media/logo.png"]);
        let mut session = session_with(fs, MockRunner::new());
        let options = WatermarkOptions {
            position: Anchor::NE,
            margins: Margins {
                top: 10,
                left: 20,
                ..Margins::default()
            },
        };
        session.set_watermark(Path::new("/media/logo.png"), &options).unwrap();
        assert_eq!(session.inputs().len(), 1);

        let compiled = session.compile(out()).unwrap();
        assert_eq!(
            compiled.args,
            [
                "-i",
                "/media/in.mp4",
                "-i",
                "/media/logo.png",
                "-filter_complex",
                "overlay=0+20:0+10",
                "/media/out.mp4"
            ]
        );
    }

    #[test]
    fn test_inline_watermark_folds_into_inputs() {
        let fs = MockFileSystem::with_files(["/media/logo.png"]);
        let mut session = session_with(fs, MockRunner::new());
        session
            .overlay_watermark(Path::new("/media/logo.png"), &WatermarkOptions::default())
            .unwrap();
        assert_eq!(session.inputs(), [PathBuf::from("/media/in.mp4"), PathBuf::from("/media/logo.png")]);
        assert!(session.video_options().watermark.is_none());
    }

    #[test]
    fn test_duplicate_raw_command() {
        let mut session = session();
        session.add_command("-y", None).unwrap();
        session.add_command("-hide_banner", None).unwrap();
        assert!(matches!(
            session.add_command("-y", None),
            Err(CoreError::DuplicateCommand(flag)) if flag == "-y"
        ));
        let compiled = session.compile(out()).unwrap();
        assert_eq!(compiled.args[2..], ["-y", "-hide_banner", "/media/out.mp4"]);
    }

    #[test]
    fn test_raw_command_colliding_with_option_fails_compile() {
        let mut session = session();
        session.add_command("-vcodec", Some("copy")).unwrap();
        session.set_video_codec("h264").unwrap();
        assert!(matches!(
            session.compile(out()),
            Err(CoreError::DuplicateCommand(flag)) if flag == "-vcodec"
        ));
    }

    #[test]
    fn test_compile_does_not_mutate_session() {
        let mut session = session();
        session.set_video_size("640x360", SizeOptions::default()).unwrap();
        let first = session.compile(out()).unwrap();
        let second = session.compile(out()).unwrap();
        assert_eq!(first, second);
        assert_eq!(session.inputs().len(), 1);
    }

    #[test]
    fn test_save_runs_engine_and_resets() {
        let runner = MockRunner::new();
        runner.add_success_expectation("out.mp4", "");
        let mut session = session_with(MockFileSystem::new(), runner.clone());
        session.set_video_codec("h264").unwrap();
        session.add_command("-y", None).unwrap();

        let saved = session.save(out()).unwrap();
        assert_eq!(saved, out());

        let calls = runner.get_received_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, PathBuf::from("ffmpeg"));
        assert!(calls[0].contains_arg("-vcodec"));

        assert_eq!(session.video_options(), &VideoOptions::default());
        assert_eq!(session.compile(out()).unwrap().args.len(), 3);
    }

    #[test]
    fn test_save_failure_keeps_session() {
        let runner = MockRunner::new();
        runner.add_exit_error_expectation("out.mp4", 1, "Conversion failed!");
        let mut session = session_with(MockFileSystem::new(), runner);
        session.set_video_codec("h264").unwrap();

        assert!(matches!(
            session.save(out()),
            Err(CoreError::CommandFailed { stderr, .. }) if stderr == "Conversion failed!"
        ));
        assert_eq!(session.video_options().codec.as_deref(), Some("h264"));
    }

    #[test]
    fn test_compile_to_output_requires_output() {
        let mut session = session();
        assert!(matches!(session.compile_to_output(), Err(CoreError::PathError(_))));
        session.set_output("/media/other.mkv");
        assert_eq!(
            session.compile_to_output().unwrap().output,
            PathBuf::from("/media/other.mkv")
        );
    }

    #[test]
    fn test_reset_restores_source_input() {
        let mut session = session();
        session.add_input("/media/extra.wav").add_filter("null").set_output("/tmp/x.mp4");
        session.add_command("-y", None).unwrap();
        session.reset();
        assert_eq!(session.inputs(), [PathBuf::from("/media/in.mp4")]);
        assert!(session.output().is_none());
        session.add_command("-y", None).unwrap();
    }
}
