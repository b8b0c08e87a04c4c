// ============================================================================
// ffcompose-core/src/transcoder.rs
// ============================================================================
//
// TRANSCODER: Public Entry Point
//
// Probes the engine and source files, opens sessions, and exposes the three
// presets as one-call operations taking a source path.
//
// `open` runs the capability probe and the file probe concurrently with
// rayon::join; neither depends on the other and both are plain subprocess
// waits.

use crate::config::CoreConfig;
use crate::engine::Engine;
use crate::error::{CoreError, CoreResult};
use crate::external::{FileSystem, ProcessRunner};
use crate::metadata::{CapabilitySet, MediaDescriptor, parse_capability_set, parse_media_descriptor};
use crate::presets::{self, FrameExtractionOptions};
use crate::session::{TranscodeSession, WatermarkOptions};

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Entry point owning the engine handle.
#[derive(Debug, Clone)]
pub struct Transcoder {
    engine: Engine,
}

impl Transcoder {
    /// Validates `config` and uses real subprocesses and `std::fs`.
    pub fn new(config: CoreConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            engine: Engine::system(config),
        })
    }

    /// Validates `config` and uses the supplied collaborators.
    pub fn with_collaborators(
        config: CoreConfig,
        runner: Arc<dyn ProcessRunner>,
        fs: Arc<dyn FileSystem>,
    ) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            engine: Engine::new(config, runner, fs),
        })
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[must_use]
    pub fn config(&self) -> &CoreConfig {
        self.engine.config()
    }

    /// Runs `ffmpeg -formats` and parses the listing.
    pub fn probe_capabilities(&self) -> CoreResult<CapabilitySet> {
        let output = self.engine.ffmpeg(&["-formats".to_string()])?;
        Ok(parse_capability_set(&output.stdout))
    }

    /// Runs `ffprobe <path>` and parses the report.
    pub fn probe_file(&self, path: &Path) -> CoreResult<MediaDescriptor> {
        let output = self
            .engine
            .ffprobe(&[path.to_string_lossy().into_owned()])?;
        Ok(parse_media_descriptor(&output.stdout))
    }

    fn check_source(&self, path: &Path) -> CoreResult<()> {
        if path.as_os_str().is_empty() {
            return Err(CoreError::EmptyInputPath);
        }
        if !self.engine.fs().exists(path) {
            return Err(CoreError::InputNotFound(path.to_path_buf()));
        }
        Ok(())
    }

    /// Probes the engine and `path`, then opens a session on it.
    pub fn open(&self, path: &Path) -> CoreResult<TranscodeSession> {
        self.check_source(path)?;
        log::debug!("Opening {}", path.display());

        let (capabilities, descriptor) =
            rayon::join(|| self.probe_capabilities(), || self.probe_file(path));

        Ok(self.load_session(path, capabilities?, descriptor?))
    }

    /// Opens a session from probe results obtained elsewhere.
    #[must_use]
    pub fn load_session(
        &self,
        path: &Path,
        capabilities: CapabilitySet,
        descriptor: MediaDescriptor,
    ) -> TranscodeSession {
        TranscodeSession::new(
            path,
            Arc::new(capabilities),
            Arc::new(descriptor),
            self.engine.clone(),
        )
    }

    /// Extracts still frames of `source` into `folder`.
    pub fn extract_frames(
        &self,
        source: &Path,
        folder: &Path,
        options: &FrameExtractionOptions,
    ) -> CoreResult<Vec<String>> {
        options.validate()?;
        let mut session = self.open(source)?;
        presets::extract_frames(&mut session, folder, options)
    }

    /// Extracts the audio track of `source` to `destination`.
    pub fn extract_audio(&self, source: &Path, destination: &Path) -> CoreResult<PathBuf> {
        let mut session = self.open(source)?;
        presets::extract_audio(&mut session, destination)
    }

    /// Overlays `watermark` onto `source`.
    pub fn watermark(
        &self,
        source: &Path,
        watermark: &Path,
        output: Option<&Path>,
        options: &WatermarkOptions,
    ) -> CoreResult<PathBuf> {
        if !self.engine.fs().exists(watermark) {
            return Err(CoreError::InvalidWatermark(watermark.to_path_buf()));
        }
        let mut session = self.open(source)?;
        presets::watermark(&mut session, watermark, output, options)
    }
}
