//! Scan service: dependency probe, execution and persistence for one tool
//!
//! The same service drives every tool; only the `Tool` profile and its
//! `ToolSettings` differ.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tracing::{debug, info};

use crate::application::services::ArtifactStore;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::ToolSettings;
use crate::domain::{ExecutionResult, ExitKind, InvocationRequest, Tool};
use crate::infrastructure::traits::CommandRunner;

/// Runs one external tool and stores what it produced.
pub struct ScanService {
    tool: Tool,
    settings: ToolSettings,
    cmd: Arc<dyn CommandRunner>,
    store: ArtifactStore,
}

impl ScanService {
    /// Create a new scan service.
    pub fn new(
        tool: Tool,
        settings: ToolSettings,
        cmd: Arc<dyn CommandRunner>,
        store: ArtifactStore,
    ) -> Self {
        Self {
            tool,
            settings,
            cmd,
            store,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn binary(&self) -> &Path {
        &self.settings.binary
    }

    /// Probe the binary with its version flag.
    ///
    /// True only if it exits 0 within the check timeout. Missing binaries,
    /// spawn errors and timeouts all count as not installed.
    pub fn check_installed(&self) -> bool {
        let args = vec![self.tool.version_flag().to_string()];
        let timeout = Duration::from_secs(self.settings.check_timeout_secs);
        match self.cmd.run_with_timeout(&self.settings.binary, &args, timeout) {
            Ok(out) => {
                debug!("check_installed: {} -> {:?}", self.tool, out.termination);
                ExitKind::from(out.termination) == ExitKind::Success
            }
            Err(e) => {
                debug!("check_installed: {} -> {}", self.tool, e);
                false
            }
        }
    }

    /// Full command line, for display.
    pub fn command_line(&self, request: &InvocationRequest) -> String {
        let mut parts = vec![self.settings.binary.display().to_string()];
        parts.extend(request.args());
        parts.join(" ")
    }

    /// Run the scan and classify how it ended.
    ///
    /// Never fails: spawn and wait errors are folded into the result's `ExitKind`.
    pub fn execute(&self, request: &InvocationRequest) -> ExecutionResult {
        let timeout = Duration::from_secs(self.settings.timeout_secs);
        debug!(
            "execute: tool={}, target={}, timeout={:?}",
            self.tool,
            request.target(),
            timeout
        );

        let result = match self
            .cmd
            .run_with_timeout(&self.settings.binary, &request.args(), timeout)
        {
            Ok(out) => ExecutionResult {
                stdout: out.stdout,
                stderr: out.stderr,
                kind: out.termination.into(),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                ExecutionResult::without_output(ExitKind::NotFound)
            }
            Err(e) => ExecutionResult::without_output(ExitKind::SpawnFailed(e.to_string())),
        };

        match &result.kind {
            ExitKind::Success => {}
            ExitKind::NonZero(code) => info!(
                "{} exited with code {}, stderr_len={}",
                self.tool,
                code,
                result.stderr.len()
            ),
            ExitKind::Killed(signal) => info!("{} killed by signal {}", self.tool, signal),
            ExitKind::TimedOut => info!("{} timed out after {:?}", self.tool, timeout),
            ExitKind::NotFound => info!(
                "{} binary not found: {}",
                self.tool,
                self.settings.binary.display()
            ),
            ExitKind::SpawnFailed(msg) => info!("{} failed to run: {}", self.tool, msg),
        }
        result
    }

    /// Persist the usable part of `result` as a new artifact.
    ///
    /// # Errors
    /// * `NoOutput` if the run yielded nothing worth keeping
    /// * `OperationFailed` if the directory or file cannot be written
    pub fn persist(&self, result: &ExecutionResult) -> ApplicationResult<PathBuf> {
        let output = result.usable_output().ok_or_else(|| ApplicationError::NoOutput {
            tool: self.tool.name().to_string(),
        })?;
        self.store.save(self.tool, output, &Local::now())
    }
}
