//! Media descriptor parsing from the free-text ffprobe report.
//!
//! The report is matched against a small table of named phrase shapes. Every
//! lookup is optional: a phrase that is not found leaves the corresponding
//! field at its documented default, so parsing never fails.

use crate::geometry::{AspectRatio, Resolution};
use crate::utils::duration_to_seconds;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Phrase shapes recognized in a probe report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phrase {
    SourceName,
    Title,
    Artist,
    Album,
    Track,
    Date,
    StartsAtZero,
    Duration,
    Container,
    Bitrate,
    VideoStream,
    AudioStream,
    Resolution,
    PixelAspect,
    DisplayAspect,
    FrameRate,
    SampleRate,
    ChannelLayout,
    AudioBitrate,
    Rotate,
}

impl Phrase {
    const ALL: [Phrase; 20] = [
        Phrase::SourceName,
        Phrase::Title,
        Phrase::Artist,
        Phrase::Album,
        Phrase::Track,
        Phrase::Date,
        Phrase::StartsAtZero,
        Phrase::Duration,
        Phrase::Container,
        Phrase::Bitrate,
        Phrase::VideoStream,
        Phrase::AudioStream,
        Phrase::Resolution,
        Phrase::PixelAspect,
        Phrase::DisplayAspect,
        Phrase::FrameRate,
        Phrase::SampleRate,
        Phrase::ChannelLayout,
        Phrase::AudioBitrate,
        Phrase::Rotate,
    ];

    fn pattern(self) -> &'static str {
        match self {
            Phrase::SourceName => r"from '(.*)'",
            Phrase::Title => r"(?m)^[ \t]*(?:INAM|title)[ \t]*:[ \t](.*?)[ \t\r]*$",
            Phrase::Artist => r"(?m)^[ \t]*artist[ \t]*:[ \t](.*?)[ \t\r]*$",
            Phrase::Album => r"(?m)^[ \t]*album[ \t]*:[ \t](.*?)[ \t\r]*$",
            Phrase::Track => r"(?m)^[ \t]*track[ \t]*:[ \t](.*?)[ \t\r]*$",
            Phrase::Date => r"(?m)^[ \t]*date[ \t]*:[ \t](.*?)[ \t\r]*$",
            Phrase::StartsAtZero => r"start: 0\.000000",
            Phrase::Duration => r"Duration: ((\d+):(\d{2}):(\d{2})\.(\d+))",
            Phrase::Container => r"Input #0, ([a-zA-Z0-9]+),",
            Phrase::Bitrate => r"bitrate: (\d+) kb/s",
            Phrase::VideoStream => r"Stream #(\d+)[.:](\d+)[^:\n]*: Video: (\w+)(.*)",
            Phrase::AudioStream => r"Stream #(\d+)[.:](\d+)[^:\n]*: Audio: (\w+)(.*)",
            Phrase::Resolution => r"(\d{2,5})x(\d{2,5})",
            Phrase::PixelAspect => r"[SP]AR (\d+):(\d+)",
            Phrase::DisplayAspect => r"DAR (\d+):(\d+)",
            Phrase::FrameRate => r"([\d.]+) (?:fps|tbr)",
            Phrase::SampleRate => r"(\d+) Hz",
            Phrase::ChannelLayout => r"Hz, ([^,]+)",
            Phrase::AudioBitrate => r"(\d+) kb/s",
            Phrase::Rotate => r"rotate\s*:\s(\d{1,3})",
        }
    }

    fn regex(self) -> &'static Regex {
        static COMPILED: Lazy<Vec<Regex>> = Lazy::new(|| {
            Phrase::ALL
                .iter()
                .map(|phrase| Regex::new(phrase.pattern()).expect("valid probe pattern"))
                .collect()
        });
        &COMPILED[self as usize]
    }

    fn captures(self, text: &str) -> Option<Captures<'_>> {
        self.regex().captures(text)
    }

    /// First capture group, if the phrase is present.
    fn find(self, text: &str) -> Option<&str> {
        self.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    fn find_number<T: std::str::FromStr>(self, text: &str) -> Option<T> {
        self.find(text).and_then(|value| value.parse().ok())
    }

    /// Two numeric groups `x:y`, both non-zero.
    fn find_ratio(self, text: &str) -> Option<(u32, u32)> {
        let caps = self.captures(text)?;
        let x = caps[1].parse::<u32>().ok()?;
        let y = caps[2].parse::<u32>().ok()?;
        (x > 0 && y > 0).then_some((x, y))
    }
}

/// Container level tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTags {
    pub filename: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub track: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDuration {
    /// As printed, e.g. `00:00:30.04`.
    pub raw: String,
    pub seconds: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStream {
    pub container: String,
    /// Overall bitrate in kb/s, 0 when absent.
    pub bitrate: u32,
    /// `major.minor` stream index.
    pub stream: f64,
    pub codec: String,
    pub resolution: Resolution,
    /// Resolution corrected to square pixels; only set for non 1:1 pixels.
    pub resolution_square: Option<Resolution>,
    /// Display aspect ratio.
    pub aspect: Option<AspectRatio>,
    /// Pixel (sample) aspect ratio.
    pub pixel: f64,
    pub pixel_string: String,
    pub rotate: u32,
    pub fps: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioChannels {
    pub raw: String,
    pub value: u32,
}

impl AudioChannels {
    fn from_layout(raw: &str) -> Self {
        let value = match raw {
            "mono" => 1,
            "stereo" => 2,
            _ => 0,
        };
        Self {
            raw: raw.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioStream {
    pub codec: String,
    /// Bitrate as reported (kb/s), empty when absent.
    pub bitrate: String,
    pub sample_rate: u32,
    pub stream: f64,
    pub channels: AudioChannels,
}

/// Structured metadata about one input file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub tags: MediaTags,
    /// Whether the primary stream starts at timestamp zero.
    pub synced: bool,
    pub duration: MediaDuration,
    pub video: VideoStream,
    pub audio: AudioStream,
}

fn stream_index(caps: &Captures<'_>) -> f64 {
    format!("{}.{}", &caps[1], &caps[2]).parse().unwrap_or(0.0)
}

fn text(phrase: Phrase, report: &str) -> String {
    phrase.find(report).unwrap_or_default().to_string()
}

/// Parses a probe report into a [`MediaDescriptor`].
#[must_use]
pub fn parse_media_descriptor(report: &str) -> MediaDescriptor {
    let tags = MediaTags {
        filename: text(Phrase::SourceName, report),
        title: text(Phrase::Title, report),
        artist: text(Phrase::Artist, report),
        album: text(Phrase::Album, report),
        track: text(Phrase::Track, report),
        date: text(Phrase::Date, report),
    };

    let duration = Phrase::Duration
        .find(report)
        .map(|raw| MediaDuration {
            raw: raw.to_string(),
            seconds: duration_to_seconds(raw, 0),
        })
        .unwrap_or_default();

    let video = parse_video(report);
    let audio = parse_audio(report);

    let descriptor = MediaDescriptor {
        tags,
        synced: Phrase::StartsAtZero.captures(report).is_some(),
        duration,
        video,
        audio,
    };
    log::debug!(
        "Parsed media descriptor: container={}, video={} {}, audio={}, duration={}s",
        descriptor.video.container,
        descriptor.video.codec,
        descriptor.video.resolution,
        descriptor.audio.codec,
        descriptor.duration.seconds
    );
    descriptor
}

fn parse_video(report: &str) -> VideoStream {
    let mut video = VideoStream {
        container: text(Phrase::Container, report),
        bitrate: Phrase::Bitrate.find_number(report).unwrap_or(0),
        rotate: Phrase::Rotate.find_number(report).unwrap_or(0),
        ..VideoStream::default()
    };

    if let Some(caps) = Phrase::VideoStream.captures(report) {
        video.stream = stream_index(&caps);
        video.codec = caps[3].to_string();

        let details = &caps[4];
        if let Some(res) = Phrase::Resolution.captures(details) {
            video.resolution = Resolution::new(
                res[1].parse().unwrap_or(0),
                res[2].parse().unwrap_or(0),
            );
        }
        video.fps = Phrase::FrameRate.find_number(details).unwrap_or(0.0);

        video.aspect = match Phrase::DisplayAspect.find_ratio(details) {
            Some((x, y)) => Some(AspectRatio::new(x, y)),
            None if video.resolution.w > 0 => {
                AspectRatio::from_dimensions(video.resolution.w, video.resolution.h).ok()
            }
            None => None,
        };

        if let Some((x, y)) = Phrase::PixelAspect.find_ratio(details) {
            video.pixel = f64::from(x) / f64::from(y);
            video.pixel_string = format!("{x}:{y}");
        }
    }

    if video.pixel_string.is_empty() && video.resolution.w > 0 {
        video.pixel = 1.0;
        video.pixel_string = "1:1".to_string();
    }

    video.resolution_square = square_resolution(video.resolution, video.pixel);
    video
}

/// Stretches the stored resolution to square pixels.
fn square_resolution(resolution: Resolution, pixel: f64) -> Option<Resolution> {
    if pixel == 0.0 || pixel == 1.0 {
        return None;
    }
    if pixel > 1.0 {
        Some(Resolution::new(
            (f64::from(resolution.w) * pixel) as u32,
            resolution.h,
        ))
    } else {
        Some(Resolution::new(
            resolution.w,
            (f64::from(resolution.h) / pixel) as u32,
        ))
    }
}

fn parse_audio(report: &str) -> AudioStream {
    let Some(caps) = Phrase::AudioStream.captures(report) else {
        return AudioStream::default();
    };
    let details = &caps[4];

    AudioStream {
        codec: caps[3].to_string(),
        bitrate: text(Phrase::AudioBitrate, details),
        sample_rate: Phrase::SampleRate.find_number(details).unwrap_or(0),
        stream: stream_index(&caps),
        channels: Phrase::ChannelLayout
            .find(details)
            .map(|raw| AudioChannels::from_layout(raw.trim()))
            .unwrap_or_default(),
    }
}
