//! Utility functions for time parsing, path handling and command rendering.
//!
//! This module provides general-purpose helpers used throughout the
//! ffcompose-core library.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static CLOCK_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+):(\d{2}):(\d{2})(?:\.\d+)?$").expect("valid clock regex"));

/// Normalizes a duration literal to whole seconds.
///
/// `HH:MM:SS` (fractional seconds are dropped) converts to total seconds, a
/// bare non-negative integer passes through, anything else yields `default`.
#[must_use]
pub fn duration_to_seconds(duration: &str, default: u64) -> u64 {
    let duration = duration.trim();
    if let Some(caps) = CLOCK_TIME.captures(duration) {
        let field = |i: usize| caps[i].parse::<u64>().unwrap_or(0);
        return field(1) * 3600 + field(2) * 60 + field(3);
    }
    duration.parse::<u64>().unwrap_or(default)
}

/// Like [`duration_to_seconds`] but distinguishes "not a duration" from zero.
#[must_use]
pub fn parse_duration_seconds(duration: &str) -> Option<u64> {
    let duration = duration.trim();
    if CLOCK_TIME.is_match(duration) || duration.parse::<u64>().is_ok() {
        Some(duration_to_seconds(duration, 0))
    } else {
        None
    }
}

/// Formats seconds as HH:MM:SS (e.g., 3725 -> "01:02:05").
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Returns the file stem of a path, or an empty string.
#[must_use]
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Wraps an argument in double quotes when a shell would split it.
///
/// Only used to render a copy-pasteable command line for logs; the process
/// runner receives the raw argument vector.
#[must_use]
pub fn shell_quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(|c| c.is_whitespace() || "\"'\\()*,;|&".contains(c)) {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
}
