//! Capability set parsing from `ffmpeg -formats` output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

static CONFIGURATION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"configuration:(.*)").expect("valid configuration regex"));
static ENABLE_FLAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--enable-([a-zA-Z0-9\-]+)").expect("valid enable regex"));
// Scope column (D, E or DE), optional device marker, id list, description.
static LISTING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(DE|D|E)(?:\s+d)?\s+([^\s=]+)\s+(\S.*)$").expect("valid listing regex")
});

/// What the installed ffmpeg build can do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    /// Features switched on at build time (`--enable-X` → `X`).
    pub modules: BTreeSet<String>,
    pub decode: BTreeSet<String>,
    pub encode: BTreeSet<String>,
}

impl CapabilitySet {
    #[must_use]
    pub fn has_module(&self, module: &str) -> bool {
        self.modules.contains(module)
    }

    #[must_use]
    pub fn can_encode(&self, id: &str) -> bool {
        self.encode.contains(id)
    }

    #[must_use]
    pub fn can_decode(&self, id: &str) -> bool {
        self.decode.contains(id)
    }
}

/// Parses the capability listing printed by the engine.
///
/// Unrecognized lines are skipped.
#[must_use]
pub fn parse_capability_set(text: &str) -> CapabilitySet {
    let mut capabilities = CapabilitySet::default();

    if let Some(caps) = CONFIGURATION_LINE.captures(text) {
        capabilities.modules = ENABLE_FLAG
            .captures_iter(&caps[1])
            .map(|enable| enable[1].to_string())
            .collect();
    }

    for line in text.lines() {
        let Some(caps) = LISTING_LINE.captures(line) else {
            continue;
        };
        let scope = &caps[1];
        for id in caps[2].split(',').filter(|id| !id.is_empty()) {
            if scope.contains('D') {
                capabilities.decode.insert(id.to_string());
            }
            if scope.contains('E') {
                capabilities.encode.insert(id.to_string());
            }
        }
    }

    log::debug!(
        "Parsed capabilities: {} modules, {} decoders, {} encoders",
        capabilities.modules.len(),
        capabilities.decode.len(),
        capabilities.encode.len()
    );
    capabilities
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMATS_OUTPUT: &str = "\
ffmpeg version 6.1.1 Copyright (c) 2000-2023 the FFmpeg developers
  built with gcc 13 (Ubuntu 13.2.0-23ubuntu3)
  configuration: --prefix=/usr --enable-gpl --enable-libmp3lame --enable-libx264 --enable-libvpx --disable-debug
  libavutil      58. 29.100 / 58. 29.100
File formats:
 D. = Demuxing supported
 .E = Muxing supported
 --
 D  aac             raw ADTS AAC (Advanced Audio Coding)
 DE h264            raw H.264 video
 DE matroska,webm   Matroska / WebM
  E mp4             MP4 (MPEG-4 Part 14)
 DE mp3             MP3 (MPEG audio layer 3)
 D d alsa           ALSA audio output
";

    #[test]
    fn test_modules_from_configuration_line() {
        let caps = parse_capability_set(FORMATS_OUTPUT);
        let modules: Vec<&str> = caps.modules.iter().map(String::as_str).collect();
        assert_eq!(modules, vec!["gpl", "libmp3lame", "libvpx", "libx264"]);
        assert!(caps.has_module("libmp3lame"));
        assert!(!caps.has_module("debug"));
    }

    #[test]
    fn test_scope_classification() {
        let caps = parse_capability_set(FORMATS_OUTPUT);
        assert!(caps.can_decode("aac") && !caps.can_encode("aac"));
        assert!(caps.can_decode("h264") && caps.can_encode("h264"));
        assert!(caps.can_encode("mp4") && !caps.can_decode("mp4"));
        assert!(caps.can_decode("alsa") && !caps.can_encode("alsa"));
    }

    #[test]
    fn test_comma_separated_ids_are_split() {
        let caps = parse_capability_set(FORMATS_OUTPUT);
        assert!(caps.can_encode("matroska"));
        assert!(caps.can_encode("webm"));
        assert!(!caps.can_encode("matroska,webm"));
    }

    #[test]
    fn test_legend_and_noise_ignored() {
        let caps = parse_capability_set(FORMATS_OUTPUT);
        assert!(!caps.decode.iter().any(|id| id.contains('=') || id == "--"));
        assert_eq!(caps.decode.len(), 6);
        assert_eq!(caps.encode.len(), 5);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_capability_set(""), CapabilitySet::default());
    }
}
