//! Audio-only extraction with a fixed output profile.

use crate::config::{
    AUDIO_EXTRACT_BITRATE, AUDIO_EXTRACT_CHANNELS, AUDIO_EXTRACT_FORMAT, AUDIO_EXTRACT_FREQUENCY,
};
use crate::error::CoreResult;
use crate::session::TranscodeSession;

use std::path::{Path, PathBuf};

/// Writes the source's audio track to `destination`, replacing any existing file.
pub fn extract_audio(session: &mut TranscodeSession, destination: &Path) -> CoreResult<PathBuf> {
    let fs = session.engine().fs();
    if fs.exists(destination) {
        log::debug!("Removing existing {}", destination.display());
        fs.remove_file(destination)?;
    }

    session.reset();
    session
        .add_command("-vn", None)?
        .add_command("-ar", Some(&AUDIO_EXTRACT_FREQUENCY.to_string()))?
        .add_command("-ac", Some(&AUDIO_EXTRACT_CHANNELS.to_string()))?
        .add_command("-ab", Some(&format!("{AUDIO_EXTRACT_BITRATE}k")))?
        .add_command("-f", Some(AUDIO_EXTRACT_FORMAT))?;

    let output = session.save(destination)?;
    log::info!(
        "Extracted audio from {} to {}",
        session.file_path().display(),
        output.display()
    );
    Ok(output)
}
