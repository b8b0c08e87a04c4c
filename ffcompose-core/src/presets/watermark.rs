//! Watermark overlay onto the whole source.

use crate::error::CoreResult;
use crate::session::{TranscodeSession, WatermarkOptions};
use crate::utils::file_stem;

use std::path::{Path, PathBuf};

/// `<source dir>/<source stem>_watermarked_<watermark stem>.<source ext>`
#[must_use]
pub fn default_watermark_output(source: &Path, watermark: &Path) -> PathBuf {
    let extension = source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let name = format!(
        "{}_watermarked_{}{extension}",
        file_stem(source),
        file_stem(watermark)
    );
    source
        .parent()
        .map_or_else(|| PathBuf::from(&name), |dir| dir.join(&name))
}

/// Overlays `watermark` onto the session's source.
///
/// Writes to `output`, or next to the source when `None`.
pub fn watermark(
    session: &mut TranscodeSession,
    watermark: &Path,
    output: Option<&Path>,
    options: &WatermarkOptions,
) -> CoreResult<PathBuf> {
    session.reset();
    session.overlay_watermark(watermark, options)?;

    let output = output.map_or_else(
        || default_watermark_output(session.file_path(), watermark),
        Path::to_path_buf,
    );
    session.add_command("-strict", Some("-2"))?;

    let output = session.save(&output)?;
    log::info!(
        "Watermarked {} with {} ({}) into {}",
        session.file_path().display(),
        watermark.display(),
        options.position,
        output.display()
    );
    Ok(output)
}
