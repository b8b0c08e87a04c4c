//! Still-frame extraction.
//!
//! Frames are written as `<stem>_%d.<ext>` inside the target folder. At most
//! one sampling policy (every N frames, every N seconds, every N percent of
//! the duration) may be active.

use crate::error::{CoreError, CoreResult};
use crate::geometry::{SizeSpec, aspect_pad_filter, compute_dimension};
use crate::session::TranscodeSession;
use crate::utils::{file_stem, parse_duration_seconds};

use regex::Regex;
use std::path::Path;

/// Options for [`extract_frames`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameExtractionOptions {
    /// `HH:MM:SS` or whole seconds.
    pub start_time: Option<String>,
    /// `HH:MM:SS` or whole seconds.
    pub duration_time: Option<String>,
    pub frame_rate: Option<f64>,
    /// Size spec; defaults to the source resolution.
    pub size: Option<String>,
    /// Maximum number of frames (`-vframes`).
    pub number: Option<u32>,
    pub every_frames: Option<u32>,
    pub every_seconds: Option<u32>,
    pub every_percentage: Option<u32>,
    pub keep_pixel_aspect_ratio: bool,
    pub keep_aspect_ratio: bool,
    pub padding_color: String,
    /// Name template; `%t` timestamp (ms), `%s` size, `%x` / `%y` its sides.
    pub file_name: Option<String>,
}

impl Default for FrameExtractionOptions {
    fn default() -> Self {
        Self {
            start_time: None,
            duration_time: None,
            frame_rate: None,
            size: None,
            number: None,
            every_frames: None,
            every_seconds: None,
            every_percentage: None,
            keep_pixel_aspect_ratio: true,
            keep_aspect_ratio: true,
            padding_color: "black".to_string(),
            file_name: None,
        }
    }
}

impl FrameExtractionOptions {
    /// Rejects a negative or non-finite frame rate, an out-of-range
    /// percentage and more than one sampling policy.
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(rate) = self.frame_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(CoreError::InvalidFrameRate(rate));
            }
        }
        sampling(self).map(|_| ())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sampling {
    Frames(u32),
    Seconds(u32),
    Percentage(u32),
}

fn sampling(options: &FrameExtractionOptions) -> CoreResult<Option<Sampling>> {
    if let Some(percent) = options.every_percentage {
        if percent == 0 || percent > 100 {
            return Err(CoreError::InvalidPercentage(percent));
        }
    }

    let active: Vec<(&'static str, Sampling)> = [
        ("every_frames", options.every_frames.map(Sampling::Frames)),
        ("every_seconds", options.every_seconds.map(Sampling::Seconds)),
        ("every_percentage", options.every_percentage.map(Sampling::Percentage)),
    ]
    .into_iter()
    .filter_map(|(name, policy)| policy.map(|p| (name, p)))
    .collect();

    match active.as_slice() {
        [] => Ok(None),
        [(_, policy)] => Ok(Some(*policy)),
        _ => Err(CoreError::ConflictingSampling(
            active.iter().map(|(name, _)| *name).collect(),
        )),
    }
}

/// Expands the name template and drops any extension from the result.
fn resolve_stem(template: Option<&str>, source: &Path, size: &str) -> String {
    let Some(template) = template else {
        return file_stem(source);
    };
    let (x, y) = size.split_once('x').unwrap_or((size, ""));
    let name = template
        .replace("%t", &chrono::Utc::now().timestamp_millis().to_string())
        .replace("%s", size)
        .replace("%x", x)
        .replace("%y", y);
    file_stem(Path::new(&name))
}

fn frame_number(name: &str, pattern: &Regex) -> Option<u64> {
    pattern.captures(name).and_then(|caps| caps[1].parse().ok())
}

/// Extracts still frames of the session's source into `folder`.
///
/// Returns the produced file names sorted by frame number.
pub fn extract_frames(
    session: &mut TranscodeSession,
    folder: &Path,
    options: &FrameExtractionOptions,
) -> CoreResult<Vec<String>> {
    options.validate()?;
    let policy = sampling(options)?;

    let descriptor = session.descriptor().clone();
    let size = options
        .size
        .clone()
        .unwrap_or_else(|| descriptor.video.resolution.to_string());
    let spec = SizeSpec::parse(&size)?;
    let dimension = compute_dimension(
        &descriptor.video,
        spec,
        options.keep_pixel_aspect_ratio,
        options.keep_aspect_ratio,
    )?;

    let extension = session.engine().config().frame_extension.clone();
    let stem = resolve_stem(options.file_name.as_deref(), session.file_path(), &size);
    let output = folder.join(format!("{stem}_%d.{extension}"));

    session.engine().fs().create_dir_all(folder)?;
    session.reset();

    if let Some(start) = options.start_time.as_deref().and_then(parse_duration_seconds) {
        if start > 0 {
            session.add_command("-ss", Some(&start.to_string()))?;
        }
    }
    if let Some(duration) = options.duration_time.as_deref().and_then(parse_duration_seconds) {
        if duration > 0 {
            session.add_command("-t", Some(&duration.to_string()))?;
        }
    }
    if let Some(frame_rate) = options.frame_rate.filter(|r| *r > 0.0) {
        session.add_command("-r", Some(&frame_rate.to_string()))?;
    }

    session.add_command("-s", Some(&format!("{}x{}", dimension.width, dimension.height)))?;
    if let Some(aspect) = &dimension.aspect {
        session.add_filter(aspect_pad_filter(aspect, Some(&options.padding_color)));
        session.add_command("-aspect", Some(&aspect.string))?;
    }

    if let Some(number) = options.number {
        session.add_command("-vframes", Some(&number.to_string()))?;
    }

    match policy {
        Some(Sampling::Frames(every)) => {
            session.add_command("-vsync", Some("0"))?;
            session.add_filter(format!("select=not(mod(n\\,{every}))"));
        }
        Some(Sampling::Seconds(every)) => {
            session.add_command("-vsync", Some("0"))?;
            session.add_filter(format!("select=not(mod(t\\,{every}))"));
        }
        Some(Sampling::Percentage(percent)) => {
            let seconds = descriptor.duration.seconds as f64 / 100.0 * f64::from(percent);
            let mut every = seconds.floor() as u64;
            if every == 0 {
                log::warn!(
                    "Sampling every {percent}% of a {}s source rounds to 0s; using 1s",
                    descriptor.duration.seconds
                );
                every = 1;
            }
            session.add_command("-vsync", Some("0"))?;
            session.add_filter(format!("select=not(mod(t\\,{every}))"));
        }
        None => {}
    }

    session.save(&output)?;

    let pattern = Regex::new(&format!(
        r"^{}_(\d+)\.{}$",
        regex::escape(&stem),
        regex::escape(&extension)
    ))
    .map_err(|e| CoreError::PathError(e.to_string()))?;

    let mut frames: Vec<(u64, String)> = session
        .engine()
        .fs()
        .list_dir(folder)?
        .into_iter()
        .filter_map(|name| frame_number(&name, &pattern).map(|n| (n, name)))
        .collect();
    frames.sort();

    log::info!(
        "Extracted {} frame(s) from {} into {}",
        frames.len(),
        session.file_path().display(),
        folder.display()
    );
    Ok(frames.into_iter().map(|(_, name)| name).collect())
}
