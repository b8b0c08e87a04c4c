// ============================================================================
// ffcompose-core/src/external/runner.rs
// ============================================================================
//
// PROCESS RUNNER: Engine Invocation Abstraction
//
// Every call into ffmpeg or ffprobe goes through the ProcessRunner trait so
// the parsing and compilation code can be exercised with a fake. The system
// implementation spawns the program directly (no shell), collects stdout and
// stderr on reader threads, and polls the child so a configured timeout can
// kill it.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::utils::shell_quote;

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Per-invocation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {
    pub timeout: Option<Duration>,
}

/// Output of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// stdout followed by stderr; the probe tools print their reports on stderr.
    pub stdout: String,
}

/// Something that can run the external engine.
pub trait ProcessRunner: Send + Sync {
    /// Runs `program` with `args` and returns its merged output.
    ///
    /// Fails with `CommandFailed` on a non-zero exit (carrying the raw
    /// diagnostic text), `CommandTimeout` when `options.timeout` elapses and
    /// `CommandStart` when the program cannot be spawned.
    fn invoke(
        &self,
        program: &Path,
        args: &[String],
        options: &ExecOptions,
    ) -> CoreResult<ProcessOutput>;
}

/// Renders a copy-pasteable command line for logs.
#[must_use]
pub fn render_command_line(program: &Path, args: &[String]) -> String {
    std::iter::once(shell_quote(&program.to_string_lossy()))
        .chain(args.iter().map(|arg| shell_quote(arg)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

fn spawn_reader<R: Read + Send + 'static>(source: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut source) = source {
            let _ = source.read_to_end(&mut buffer);
        }
        String::from_utf8_lossy(&buffer).into_owned()
    })
}

fn collect(reader: JoinHandle<String>) -> String {
    reader.join().unwrap_or_default()
}

/// Waits for the child, killing it once `timeout` has elapsed.
///
/// Returns `Ok(None)` when the child was killed.
fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> io::Result<Option<ExitStatus>> {
    let Some(limit) = timeout else {
        return child.wait().map(Some);
    };
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if started.elapsed() >= limit {
            child.kill()?;
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Kills and reaps the child when waiting on it failed.
fn reap_on_error<T>(child: &mut Child, result: io::Result<T>) -> io::Result<T> {
    if let Err(e) = &result {
        log::error!("Waiting on child {} failed: {e}; killing it", child.id());
        let _ = child.kill();
        let _ = child.wait();
    }
    result
}

impl ProcessRunner for SystemRunner {
    fn invoke(
        &self,
        program: &Path,
        args: &[String],
        options: &ExecOptions,
    ) -> CoreResult<ProcessOutput> {
        let cmd_name = program.display().to_string();
        log::debug!("COMMAND >> {}", render_command_line(program, args));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    CoreError::DependencyNotFound(cmd_name.clone())
                } else {
                    command_start_error(cmd_name.clone(), e)
                }
            })?;

        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let waited = wait_with_timeout(&mut child, options.timeout);
        let waited = reap_on_error(&mut child, waited);
        let stdout = collect(stdout_reader);
        let stderr = collect(stderr_reader);
        let status = waited?;

        let Some(status) = status else {
            let secs = options.timeout.map_or(0, |t| t.as_secs());
            log::error!("{cmd_name} timed out after {secs}s");
            return Err(CoreError::CommandTimeout { cmd: cmd_name, secs });
        };

        if !status.success() {
            log::error!("{cmd_name} exited with {status}");
            let diagnostics = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(command_failed_error(cmd_name, status, diagnostics));
        }

        Ok(ProcessOutput {
            stdout: stdout + &stderr,
        })
    }
}

/// Checks that a required external command is available and executable.
///
/// Runs `<program> -version` and discards its output.
pub fn check_dependency(program: &Path) -> CoreResult<()> {
    let name = program.display().to_string();
    match Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => {
            log::debug!("Found dependency: {name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{name}' not found.");
            Err(CoreError::DependencyNotFound(name))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{name}': {e}");
            Err(command_start_error(name, e))
        }
    }
}
