//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::domain::Termination;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Write string content to file, replacing any existing content.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Captured output of an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub termination: Termination,
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, capturing stdout/stderr as text.
    ///
    /// Blocks until the process exits or `timeout` elapses. On timeout the
    /// process is killed and its output discarded (`Termination::TimedOut`).
    /// A missing program surfaces as `io::ErrorKind::NotFound`.
    fn run_with_timeout(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> io::Result<CommandOutput>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Real command runner implementation.
#[derive(Debug)]
pub struct RealCommandRunner {
    poll_interval: Duration,
}

impl Default for RealCommandRunner {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(25),
        }
    }
}

impl RealCommandRunner {
    /// Poll the child until it exits or `deadline` passes; `None` deadline waits indefinitely.
    fn wait_until(
        &self,
        child: &mut Child,
        deadline: Option<Instant>,
    ) -> io::Result<Option<ExitStatus>> {
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Ok(None);
            }
            thread::sleep(self.poll_interval);
        }
    }
}

impl CommandRunner for RealCommandRunner {
    fn run_with_timeout(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> io::Result<CommandOutput> {
        debug!(
            "run_with_timeout: program={}, args={:?}, timeout={:?}",
            program.display(),
            args,
            timeout
        );
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain both pipes concurrently so a chatty child never blocks on a full pipe
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        // A timeout too large to represent is no deadline at all
        let deadline = Instant::now().checked_add(timeout);
        let status = match self.wait_until(&mut child, deadline) {
            Ok(Some(status)) => status,
            Ok(None) => {
                debug!("run_with_timeout: deadline reached, killing pid={}", child.id());
                kill_and_reap(&mut child);
                return Ok(CommandOutput::timed_out());
            }
            Err(e) => {
                debug!("run_with_timeout: wait failed for pid={}: {}", child.id(), e);
                kill_and_reap(&mut child);
                return Err(e);
            }
        };

        // Background processes may inherit the pipes and outlive the child
        let Some(stdout) = collect(stdout, deadline)? else {
            debug!("run_with_timeout: stdout still open at deadline");
            return Ok(CommandOutput::timed_out());
        };
        let Some(stderr) = collect(stderr, deadline)? else {
            debug!("run_with_timeout: stderr still open at deadline");
            return Ok(CommandOutput::timed_out());
        };
        let termination = termination_of(status);
        debug!(
            "run_with_timeout: termination={:?}, stdout_len={}, stderr_len={}",
            termination,
            stdout.len(),
            stderr.len()
        );

        Ok(CommandOutput {
            stdout,
            stderr,
            termination,
        })
    }
}

impl CommandOutput {
    /// Output of a run abandoned at its deadline: nothing is kept.
    fn timed_out() -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            termination: Termination::TimedOut,
        }
    }
}

fn kill_and_reap(child: &mut Child) {
    // The child may have exited between the last poll and the kill
    if let Err(e) = child.kill() {
        trace!("kill pid={}: {}", child.id(), e);
    }
    if let Err(e) = child.wait() {
        trace!("reap pid={}: {}", child.id(), e);
    }
}

/// Read `pipe` to the end on its own thread; the result arrives on the returned channel.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<io::Result<Vec<u8>>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let result = pipe.read_to_end(&mut buf).map(|_| buf);
        // Receiver is gone once the run has been abandoned
        let _ = tx.send(result);
    });
    rx
}

/// Wait for a drained pipe until `deadline`. `Ok(None)` means the pipe is still open.
fn collect(
    pipe: Option<Receiver<io::Result<Vec<u8>>>>,
    deadline: Option<Instant>,
) -> io::Result<Option<String>> {
    let Some(rx) = pipe else {
        return Ok(Some(String::new()));
    };
    let received = match deadline {
        Some(d) => rx.recv_timeout(d.saturating_duration_since(Instant::now())),
        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };
    let bytes = match received {
        Ok(result) => result?,
        Err(RecvTimeoutError::Timeout) => return Ok(None),
        Err(RecvTimeoutError::Disconnected) => {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "output reader thread panicked",
            ))
        }
    };
    // Artifacts hold tool output verbatim, never a lossy decoding
    String::from_utf8(bytes).map(Some).map_err(|e| {
        warn!("tool output is not valid UTF-8: {}", e);
        io::Error::new(io::ErrorKind::InvalidData, e)
    })
}

#[cfg(unix)]
fn termination_of(status: ExitStatus) -> Termination {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => Termination::Exited(code),
        (None, Some(signal)) => Termination::Signaled(signal),
        (None, None) => Termination::Exited(-1),
    }
}

#[cfg(not(unix))]
fn termination_of(status: ExitStatus) -> Termination {
    Termination::Exited(status.code().unwrap_or(-1))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::domain::SIGKILL;

    fn sh(script: &str, timeout: Duration) -> io::Result<CommandOutput> {
        RealCommandRunner::default().run_with_timeout(
            Path::new("/bin/sh"),
            &["-c".to_string(), script.to_string()],
            timeout,
        )
    }

    #[test]
    fn captures_stdout_and_stderr_of_clean_exit() {
        let out = sh("printf 'a\\nb\\n'; printf err >&2", Duration::from_secs(10)).unwrap();
        assert_eq!(out.stdout, "a\nb\n");
        assert_eq!(out.stderr, "err");
        assert_eq!(out.termination, Termination::Exited(0));
    }

    #[test]
    fn reports_nonzero_exit_code() {
        let out = sh("echo partial; exit 3", Duration::from_secs(10)).unwrap();
        assert_eq!(out.stdout, "partial\n");
        assert_eq!(out.termination, Termination::Exited(3));
    }

    #[test]
    fn detects_sigkill_and_keeps_partial_output() {
        let out = sh("printf sub1.example.com; kill -9 $$", Duration::from_secs(10)).unwrap();
        assert_eq!(out.stdout, "sub1.example.com");
        assert_eq!(out.termination, Termination::Signaled(SIGKILL));
    }

    #[test]
    fn kills_process_after_timeout_and_discards_output() {
        let started = Instant::now();
        let out = sh("echo early; sleep 5", Duration::from_millis(200)).unwrap();
        assert_eq!(out.termination, Termination::TimedOut);
        assert!(out.stdout.is_empty());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn missing_program_is_not_found() {
        let err = RealCommandRunner::default()
            .run_with_timeout(
                Path::new("/nonexistent/bin/uncover"),
                &[],
                Duration::from_secs(1),
            )
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn background_process_holding_pipes_does_not_outlast_timeout() {
        let started = Instant::now();
        let out = sh("echo hi; sleep 6 &", Duration::from_secs(1)).unwrap();
        assert_eq!(out.termination, Termination::TimedOut);
        assert!(out.stdout.is_empty());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn unrepresentable_timeout_means_no_deadline() {
        let out = sh("echo done", Duration::from_secs(u64::MAX)).unwrap();
        assert_eq!(out.stdout, "done\n");
        assert_eq!(out.termination, Termination::Exited(0));
    }

    #[test]
    fn invalid_utf8_output_is_an_error() {
        let err = sh("printf 'a\\377b'", Duration::from_secs(10)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn kill_and_reap_stops_running_child() {
        let mut child = Command::new("/bin/sh")
            .args(["-c", "sleep 5"])
            .spawn()
            .unwrap();
        let started = Instant::now();

        kill_and_reap(&mut child);

        assert!(child.try_wait().unwrap().is_some());
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
