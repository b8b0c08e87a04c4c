// Shared fixtures for the integration tests.
#![allow(dead_code)]

use ffcompose_core::external::mocks::{MockFileSystem, MockRunner};
use ffcompose_core::{CoreConfig, CoreConfigBuilder, FileSystem, Transcoder};
use std::sync::Arc;
use std::time::Duration;

pub const FORMATS_OUTPUT: &str = "\
ffmpeg version 6.1.1 Copyright (c) 2000-2023 the FFmpeg developers
  built with gcc 13 (Ubuntu 13.2.0-23ubuntu3)
  configuration: --prefix=/usr --enable-gpl --enable-libmp3lame --enable-libx264 --disable-debug
File formats:
 D. = Demuxing supported
 .E = Muxing supported
 --
 DE aac             raw ADTS AAC (Advanced Audio Coding)
 DE h264            raw H.264 video
 DE matroska,webm   Matroska / WebM
  E mp4             MP4 (MPEG-4 Part 14)
 DE mp3             MP3 (MPEG audio layer 3)
  E image2          image2 sequence
";

pub const PROBE_REPORT: &str = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'clip.mp4':
  Metadata:
    title           : Harbour at dusk
  Duration: 00:00:30.00, start: 0.000000, bitrate: 1500 kb/s
  Stream #0:0[0x1](und): Video: h264 (High) (avc1 / 0x31637661), yuv420p(progressive), 1280x720, 1370 kb/s, 30 fps, 30 tbr, 15360 tbn (default)
  Stream #0:1[0x2](und): Audio: aac (LC) (mp4a / 0x6134706D), 48000 Hz, stereo, fltp, 128 kb/s (default)
";

pub fn test_config() -> CoreConfig {
    CoreConfigBuilder::new()
        .ffmpeg_path("ffmpeg")
        .ffprobe_path("ffprobe")
        .timeout(Duration::from_secs(120))
        .build()
}

/// Runner already primed with the two probe responses `open` needs.
pub fn probed_runner() -> MockRunner {
    let runner = MockRunner::new();
    runner.add_success_expectation("-formats", FORMATS_OUTPUT);
    runner.add_success_expectation("ffprobe", PROBE_REPORT);
    runner
}

pub fn transcoder(runner: &MockRunner, fs: Arc<dyn FileSystem>) -> Transcoder {
    Transcoder::with_collaborators(test_config(), Arc::new(runner.clone()), fs)
        .expect("valid test config")
}

pub fn mock_transcoder(runner: &MockRunner, files: &[&str]) -> Transcoder {
    let fs = MockFileSystem::with_files(files.iter().copied());
    transcoder(runner, Arc::new(fs))
}

/// Position of the flag `flag` immediately followed by `value`.
pub fn flag_position(args: &[String], flag: &str, value: &str) -> Option<usize> {
    args.windows(2)
        .position(|pair| pair[0] == flag && pair[1] == value)
}
