//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reconrun::config::Settings;
use reconrun::domain::Termination;
use reconrun::infrastructure::di::ServiceContainer;
use reconrun::infrastructure::traits::{CommandOutput, CommandRunner, RealFileSystem};

/// Canned answer of the scripted runner.
#[derive(Debug, Clone)]
pub enum Reply {
    Output(CommandOutput),
    NotFound,
    Fail(String),
}

impl Reply {
    pub fn exited(code: i32, stdout: &str, stderr: &str) -> Self {
        Reply::Output(CommandOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            termination: Termination::Exited(code),
        })
    }

    pub fn signaled(signal: i32, stdout: &str) -> Self {
        Reply::Output(CommandOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
            termination: Termination::Signaled(signal),
        })
    }

    pub fn timed_out() -> Self {
        Reply::Output(CommandOutput {
            stdout: String::new(),
            stderr: String::new(),
            termination: Termination::TimedOut,
        })
    }
}

/// Command runner answering the `-version` probe and the scan with fixed replies.
#[derive(Debug)]
pub struct ScriptedRunner {
    probe: Reply,
    scan: Reply,
    calls: Mutex<Vec<(PathBuf, Vec<String>, Duration)>>,
}

impl ScriptedRunner {
    pub fn new(probe: Reply, scan: Reply) -> Self {
        Self {
            probe,
            scan,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Installed tool whose scan answers with `scan`.
    pub fn installed(scan: Reply) -> Self {
        Self::new(Reply::exited(0, "v1.0.0\n", ""), scan)
    }

    pub fn calls(&self) -> Vec<(PathBuf, Vec<String>, Duration)> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than the `-version` probe.
    pub fn scan_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|(_, args, _)| args.first().map(String::as_str) != Some("-version"))
            .count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run_with_timeout(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> io::Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_path_buf(), args.to_vec(), timeout));
        let reply = if args.first().map(String::as_str) == Some("-version") {
            &self.probe
        } else {
            &self.scan
        };
        match reply {
            Reply::Output(out) => Ok(out.clone()),
            Reply::NotFound => Err(io::Error::new(io::ErrorKind::NotFound, "no such file")),
            Reply::Fail(msg) => Err(io::Error::new(io::ErrorKind::Other, msg.clone())),
        }
    }
}

/// Settings writing into `root/outputs` and probing `root/venv`.
pub fn test_settings(root: &Path) -> Settings {
    Settings {
        output_dir: root.join("outputs"),
        venv_dir: root.join("venv"),
        ..Settings::default()
    }
}

pub fn container(root: &Path, runner: Arc<ScriptedRunner>) -> ServiceContainer {
    ServiceContainer::with_deps(test_settings(root), Arc::new(RealFileSystem), runner)
}

/// Files currently in `dir`, sorted; empty if `dir` does not exist.
pub fn artifacts(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    files.sort();
    files
}
