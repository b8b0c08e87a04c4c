// ffcompose-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.

use super::{ExecOptions, FileSystem, ProcessOutput, ProcessRunner};
use crate::error::{CoreError, CoreResult, command_failed_error};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// What a matched expectation does.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Success(String),
    Failure { exit_code: i32, stderr: String },
    Timeout,
}

/// An expected invocation and its canned result.
#[derive(Debug, Clone)]
pub struct MockExpectation {
    /// Matched against the program path and every argument by substring.
    pub pattern: String,
    pub outcome: MockOutcome,
    /// Files touched on disk when a successful invocation is matched.
    pub creates: Vec<PathBuf>,
}

/// One invocation seen by [`MockRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

impl RecordedCall {
    pub fn contains_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

/// Mock [`ProcessRunner`] supporting multiple expectations.
///
/// Each invocation consumes the first unused expectation whose pattern
/// matches. An invocation without a matching expectation panics.
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    expectations: Arc<Mutex<Vec<MockExpectation>>>,
    received_calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_expectation(&self, expectation: MockExpectation) {
        lock(&self.expectations).push(expectation);
    }

    pub fn add_success_expectation(&self, pattern: &str, stdout: &str) {
        self.add_expectation(MockExpectation {
            pattern: pattern.to_string(),
            outcome: MockOutcome::Success(stdout.to_string()),
            creates: Vec::new(),
        });
    }

    /// Like [`add_success_expectation`](Self::add_success_expectation), also
    /// creating `files` as the engine would.
    pub fn add_success_expectation_with_outputs(&self, pattern: &str, stdout: &str, files: Vec<PathBuf>) {
        self.add_expectation(MockExpectation {
            pattern: pattern.to_string(),
            outcome: MockOutcome::Success(stdout.to_string()),
            creates: files,
        });
    }

    pub fn add_exit_error_expectation(&self, pattern: &str, exit_code: i32, stderr: &str) {
        self.add_expectation(MockExpectation {
            pattern: pattern.to_string(),
            outcome: MockOutcome::Failure {
                exit_code,
                stderr: stderr.to_string(),
            },
            creates: Vec::new(),
        });
    }

    pub fn add_timeout_expectation(&self, pattern: &str) {
        self.add_expectation(MockExpectation {
            pattern: pattern.to_string(),
            outcome: MockOutcome::Timeout,
            creates: Vec::new(),
        });
    }

    pub fn get_received_calls(&self) -> Vec<RecordedCall> {
        lock(&self.received_calls).clone()
    }

    pub fn pending_expectations(&self) -> usize {
        lock(&self.expectations).len()
    }
}

impl ProcessRunner for MockRunner {
    fn invoke(
        &self,
        program: &Path,
        args: &[String],
        options: &ExecOptions,
    ) -> CoreResult<ProcessOutput> {
        lock(&self.received_calls).push(RecordedCall {
            program: program.to_path_buf(),
            args: args.to_vec(),
            timeout: options.timeout,
        });

        let program_name = program.to_string_lossy();
        let expectation = {
            let mut expectations = lock(&self.expectations);
            let found_index = expectations.iter().position(|exp| {
                program_name.contains(&exp.pattern) || args.iter().any(|arg| arg.contains(&exp.pattern))
            });
            match found_index {
                Some(index) => expectations.remove(index),
                None => {
                    log::error!("MockRunner: No expectation found for {program_name} {args:?}");
                    panic!("MockRunner: No expectation found for {program_name} {args:?}");
                }
            }
        };
        log::debug!("MockRunner: Matched expectation with pattern '{}'", expectation.pattern);

        match expectation.outcome {
            MockOutcome::Success(stdout) => {
                for file in &expectation.creates {
                    if let Some(parent) = file.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::File::create(file)?;
                }
                Ok(ProcessOutput { stdout })
            }
            MockOutcome::Failure { exit_code, stderr } => Err(command_failed_error(
                program_name.into_owned(),
                exit_status(exit_code),
                stderr,
            )),
            MockOutcome::Timeout => Err(CoreError::CommandTimeout {
                cmd: program_name.into_owned(),
                secs: options.timeout.map_or(0, |t| t.as_secs()),
            }),
        }
    }
}

/// In-memory [`FileSystem`].
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<BTreeSet<PathBuf>>>,
    dirs: Arc<Mutex<BTreeSet<PathBuf>>>,
    removed: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let fs = Self::new();
        for file in files {
            fs.add_file(file);
        }
        fs
    }

    pub fn add_file(&self, path: impl Into<PathBuf>) {
        lock(&self.files).insert(path.into());
    }

    pub fn created_dirs(&self) -> Vec<PathBuf> {
        lock(&self.dirs).iter().cloned().collect()
    }

    pub fn removed_files(&self) -> Vec<PathBuf> {
        lock(&self.removed).clone()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        lock(&self.files).contains(path) || lock(&self.dirs).contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> CoreResult<()> {
        let mut dirs = lock(&self.dirs);
        for ancestor in path.ancestors().filter(|p| !p.as_os_str().is_empty()) {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> CoreResult<()> {
        if !lock(&self.files).remove(path) {
            return Err(CoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )));
        }
        lock(&self.removed).push(path.to_path_buf());
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> CoreResult<Vec<String>> {
        Ok(lock(&self.files)
            .iter()
            .filter(|file| file.parent() == Some(path))
            .filter_map(|file| file.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }
}
