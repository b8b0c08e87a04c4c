// ============================================================================
// ffcompose-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with the Engine and the File System
//
// Everything that leaves the process goes through the two traits defined
// here. Sessions and presets receive them as `Arc<dyn ...>` so a single
// Transcoder can share one runner between the parallel probes and every
// session it opens.
//
// KEY COMPONENTS:
// - ProcessRunner / SystemRunner: engine invocation with timeout
// - FileSystem / StdFileSystem: existence checks, folders, listing
// - check_dependency: early detection of a missing engine binary
// - mocks: canned runner and in-memory filesystem for tests ("test-mocks")

mod filesystem;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;
mod runner;

pub use filesystem::{FileSystem, StdFileSystem};
pub use runner::{
    ExecOptions, ProcessOutput, ProcessRunner, SystemRunner, check_dependency,
    render_command_line,
};
