// ============================================================================
// ffcompose-core/src/engine.rs
// ============================================================================
//
// ENGINE HANDLE: Shared Access to the External Transcoding Engine
//
// Bundles the configuration with the injected collaborators. The handle is
// cheap to clone; the Transcoder, the parallel probes and every session hold
// their own copy.

use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::external::{
    ExecOptions, FileSystem, ProcessOutput, ProcessRunner, StdFileSystem, SystemRunner,
};
use crate::session::CompiledCommand;

use std::fmt;
use std::sync::Arc;

/// Configuration plus the process and filesystem collaborators.
#[derive(Clone)]
pub struct Engine {
    config: Arc<CoreConfig>,
    runner: Arc<dyn ProcessRunner>,
    fs: Arc<dyn FileSystem>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(
        config: CoreConfig,
        runner: Arc<dyn ProcessRunner>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            runner,
            fs,
        }
    }

    /// Engine backed by real subprocesses and `std::fs`.
    pub fn system(config: CoreConfig) -> Self {
        Self::new(config, Arc::new(SystemRunner), Arc::new(StdFileSystem))
    }

    #[must_use]
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    #[must_use]
    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            timeout: self.config.timeout,
        }
    }

    pub fn ffmpeg(&self, args: &[String]) -> CoreResult<ProcessOutput> {
        self.runner
            .invoke(&self.config.ffmpeg_path, args, &self.exec_options())
    }

    pub fn ffprobe(&self, args: &[String]) -> CoreResult<ProcessOutput> {
        self.runner
            .invoke(&self.config.ffprobe_path, args, &self.exec_options())
    }

    /// Runs a compiled command through ffmpeg.
    pub fn run(&self, compiled: &CompiledCommand) -> CoreResult<ProcessOutput> {
        self.ffmpeg(&compiled.args)
    }
}
