//! Filesystem access used by sessions and presets.
//!
//! Kept behind a trait so watermark validation, output cleanup and frame
//! listing can run against an in-memory fake.

use crate::error::CoreResult;

use std::fs;
use std::path::Path;

/// The small set of filesystem operations the core needs.
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> CoreResult<()>;

    fn remove_file(&self, path: &Path) -> CoreResult<()>;

    /// Lists the file names (not full paths) directly inside `path`.
    fn list_dir(&self, path: &Path) -> CoreResult<Vec<String>>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> CoreResult<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> CoreResult<()> {
        fs::remove_file(path)?;
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> CoreResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}
