//! Command execution: validate → check dependency → execute → persist

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::services::probe_isolation;
use crate::application::ApplicationError;
use crate::cli::args::Cli;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::domain::{ExecutionResult, ExitKind, InvocationRequest, RuntimeIsolation, Tool, SIGKILL};
use crate::infrastructure::di::ServiceContainer;

/// Run one scan for `tool` as described by `cli`.
///
/// Progress is printed as it happens; the returned error is reported by the
/// caller via [`report_error`].
#[instrument(skip(cli, container))]
pub fn execute(cli: &Cli, tool: Tool, container: &ServiceContainer) -> CliResult<()> {
    let target = cli.target.as_deref().unwrap_or_default();
    let request =
        InvocationRequest::new(tool, target).map_err(|_| CliError::MissingTarget { tool })?;

    let service = container.scan_service(tool);
    if !service.check_installed() {
        return Err(ApplicationError::ToolUnavailable {
            tool: tool.name().to_string(),
            binary: service.binary().to_path_buf(),
        }
        .into());
    }

    report_isolation(probe_isolation(
        container.fs.as_ref(),
        &container.settings.venv_dir,
    ));

    output::info(&format!(
        "Starting {} {} scan for: {}",
        tool,
        tool.target_label(),
        request.target()
    ));
    output::info(&format!("Executing: {}", service.command_line(&request)));

    let result = service.execute(&request);
    report_execution(
        tool,
        &result,
        service.binary(),
        container.settings.tool(tool).timeout_secs,
    );

    let path = service.persist(&result)?;
    debug!("execute: artifact={}", path.display());
    output::info(&format!("{} results saved as {}", tool, path.display()));
    output::success(&format!("{} completed successfully", tool));
    Ok(())
}

/// Advisory note about an isolated runtime directory.
pub fn report_isolation(isolation: RuntimeIsolation) {
    match isolation {
        RuntimeIsolation::Absent => {}
        RuntimeIsolation::Present { interpreter: true } => {
            output::info("Virtual environment found");
            output::info("Using virtual environment Python");
        }
        RuntimeIsolation::Present { interpreter: false } => {
            output::info("Virtual environment found");
            output::info("Virtual environment found but Python not detected");
        }
    }
}

/// Describe how the external process ended.
pub fn report_execution(tool: Tool, result: &ExecutionResult, binary: &Path, timeout_secs: u64) {
    match &result.kind {
        ExitKind::Success => {}
        ExitKind::Killed(SIGKILL) => {
            output::warning(&format!(
                "{} process was killed by SIGKILL (likely due to memory/resource limits)",
                tool
            ));
            if result.usable_output().is_some() {
                output::info("Salvaging partial output captured before the kill");
            }
        }
        ExitKind::Killed(signal) => {
            output::warning(&format!("{} process was terminated by signal {}", tool, signal));
            report_stderr(tool, &result.stderr);
        }
        ExitKind::NonZero(code) => {
            output::failure(&format!("{} exited with code {}", tool, code));
            report_stderr(tool, &result.stderr);
        }
        ExitKind::TimedOut => {
            output::failure(&format!("{} timed out after {}s", tool, timeout_secs));
        }
        ExitKind::NotFound => {
            output::error(&format!(
                "{} command not found. Please ensure {} is installed at {}",
                tool,
                tool,
                binary.display()
            ));
        }
        ExitKind::SpawnFailed(msg) => {
            output::error(&format!("Unexpected error running {}: {}", tool, msg));
        }
    }
}

fn report_stderr(tool: Tool, stderr: &str) {
    if !stderr.is_empty() {
        output::detail(&format!("{} error output:", tool));
        output::detail(stderr);
    }
}

/// Print `err` with the hint matching its class.
pub fn report_error(tool: Tool, err: &CliError) {
    match err {
        CliError::MissingTarget { .. } => {
            output::error(err);
            output::detail(&format!(
                "Usage: {} {}",
                Cli::bin_name(tool),
                tool.usage_example()
            ));
        }
        CliError::Infra(crate::infrastructure::InfraError::Application(app)) => match app {
            ApplicationError::ToolUnavailable { .. } => {
                output::error(err);
                output::detail(&format!(
                    "Please install {} first: {}",
                    tool,
                    tool.install_hint()
                ));
            }
            ApplicationError::NoOutput { .. } => {
                output::failure(err);
                output::failure(&format!("{} completed with errors or warnings", tool));
            }
            _ => {
                output::error(&format!("Error running {}: {}", tool, err));
                output::failure(&format!("{} completed with errors or warnings", tool));
            }
        },
        _ => output::error(err),
    }
}
