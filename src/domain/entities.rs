//! Domain entities: tool profiles, invocation requests, execution results

use std::fmt;

use chrono::{DateTime, TimeZone};

use crate::domain::DomainError;

/// External reconnaissance tool wrapped by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Asset discovery across search engines (`uncover -q <query>`)
    Uncover,
    /// Subdomain wordlist permutation (`alterx -l <list>`)
    Alterx,
}

impl Tool {
    /// Short name used in messages and the settings key.
    pub fn name(self) -> &'static str {
        match self {
            Tool::Uncover => "uncover",
            Tool::Alterx => "alterx",
        }
    }

    /// Where the binary is installed by `go install`.
    pub fn default_binary(self) -> &'static str {
        match self {
            Tool::Uncover => "/go/bin/uncover",
            Tool::Alterx => "/go/bin/alterx",
        }
    }

    /// Flag answering with the tool version and exit status 0.
    pub fn version_flag(self) -> &'static str {
        "-version"
    }

    /// Flag that takes the target as its value.
    pub fn target_flag(self) -> &'static str {
        match self {
            Tool::Uncover => "-q",
            Tool::Alterx => "-l",
        }
    }

    /// Flag suppressing the tool's banner and log lines.
    pub fn silent_flag(self) -> &'static str {
        "-silent"
    }

    /// Argument list for a scan of `target`.
    pub fn scan_args(self, target: &str) -> Vec<String> {
        vec![
            self.target_flag().to_string(),
            target.to_string(),
            self.silent_flag().to_string(),
        ]
    }

    /// Suffix appended to the artifact timestamp.
    pub fn output_suffix(self) -> &'static str {
        match self {
            Tool::Uncover => "-uncover",
            Tool::Alterx => "-alterx",
        }
    }

    pub fn install_hint(self) -> &'static str {
        match self {
            Tool::Uncover => "https://uncover.projectdiscovery.io/uncover/get-started/",
            Tool::Alterx => "https://github.com/projectdiscovery/alterx#installation",
        }
    }

    /// What the positional argument means for this tool.
    pub fn target_label(self) -> &'static str {
        match self {
            Tool::Uncover => "query_location",
            Tool::Alterx => "subdomain list",
        }
    }

    pub fn usage_example(self) -> &'static str {
        match self {
            Tool::Uncover => "example.com",
            Tool::Alterx => "subdomains.txt",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single scan request, fixed for the lifetime of one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    tool: Tool,
    target: String,
}

impl InvocationRequest {
    /// Create a request; the target must contain non-whitespace characters.
    pub fn new(tool: Tool, target: impl Into<String>) -> Result<Self, DomainError> {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(DomainError::EmptyTarget(tool.name().to_string()));
        }
        Ok(Self { tool, target })
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn args(&self) -> Vec<String> {
        self.tool.scan_args(&self.target)
    }
}

/// How the external process ended, as observed by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Exited(i32),
    Signaled(i32),
    TimedOut,
}

/// Signal number delivered by the OOM killer and `kill -9`.
pub const SIGKILL: i32 = 9;

/// Classified outcome of one external tool execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitKind {
    Success,
    NonZero(i32),
    Killed(i32),
    TimedOut,
    NotFound,
    SpawnFailed(String),
}

impl From<Termination> for ExitKind {
    fn from(termination: Termination) -> Self {
        match termination {
            Termination::Exited(0) => ExitKind::Success,
            Termination::Exited(code) => ExitKind::NonZero(code),
            Termination::Signaled(signal) => ExitKind::Killed(signal),
            Termination::TimedOut => ExitKind::TimedOut,
        }
    }
}

/// Captured output plus its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub kind: ExitKind,
}

impl ExecutionResult {
    /// Result for a run that produced nothing to capture.
    pub fn without_output(kind: ExitKind) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            kind,
        }
    }

    /// Output worth persisting, or `None` when nothing usable was captured.
    ///
    /// A clean exit returns stdout as-is, even when empty. Nonzero exits and
    /// signal kills salvage stdout only if it holds more than whitespace.
    /// Timeouts and spawn failures never yield output.
    pub fn usable_output(&self) -> Option<&str> {
        match self.kind {
            ExitKind::Success => Some(&self.stdout),
            ExitKind::NonZero(_) | ExitKind::Killed(_) => {
                if self.stdout.trim().is_empty() {
                    None
                } else {
                    Some(&self.stdout)
                }
            }
            ExitKind::TimedOut | ExitKind::NotFound | ExitKind::SpawnFailed(_) => None,
        }
    }
}

/// Whether an isolated runtime directory (e.g. `venv/`) sits next to the run.
///
/// Reported to the user only; nothing is switched based on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeIsolation {
    Absent,
    Present { interpreter: bool },
}

/// Artifact file name: `YYYYMMDDHHMMSSmmm<suffix>.txt`.
pub fn artifact_file_name<Tz>(at: &DateTime<Tz>, tool: Tool) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!("{}{}.txt", at.format("%Y%m%d%H%M%S%3f"), tool.output_suffix())
}

/// Expand `~`, `$VAR` and `${VAR}`; returns the input unchanged on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rstest::rstest;

    #[rstest]
    #[case(Tool::Uncover, "example.com", vec!["-q", "example.com", "-silent"])]
    #[case(Tool::Alterx, "subs.txt", vec!["-l", "subs.txt", "-silent"])]
    fn scan_args_follow_tool_template(
        #[case] tool: Tool,
        #[case] target: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(tool.scan_args(target), expected);
    }

    #[test]
    fn blank_target_is_rejected() {
        assert!(InvocationRequest::new(Tool::Uncover, "  ").is_err());
        assert!(InvocationRequest::new(Tool::Uncover, "example.com").is_ok());
    }

    #[rstest]
    #[case(ExitKind::Success, "", Some(""))]
    #[case(ExitKind::Success, "a.example.com\n", Some("a.example.com\n"))]
    #[case(ExitKind::NonZero(2), "a.example.com\n", Some("a.example.com\n"))]
    #[case(ExitKind::NonZero(2), " \n\t", None)]
    #[case(ExitKind::Killed(SIGKILL), "sub1.example.com", Some("sub1.example.com"))]
    #[case(ExitKind::Killed(SIGKILL), "\n\n", None)]
    #[case(ExitKind::TimedOut, "buffered", None)]
    #[case(ExitKind::NotFound, "", None)]
    #[case(ExitKind::SpawnFailed("boom".into()), "x", None)]
    fn usable_output_applies_salvage_policy(
        #[case] kind: ExitKind,
        #[case] stdout: &str,
        #[case] expected: Option<&str>,
    ) {
        let result = ExecutionResult {
            stdout: stdout.to_string(),
            stderr: String::new(),
            kind,
        };
        assert_eq!(result.usable_output(), expected);
    }

    #[test]
    fn termination_maps_to_exit_kind() {
        assert_eq!(ExitKind::from(Termination::Exited(0)), ExitKind::Success);
        assert_eq!(ExitKind::from(Termination::Exited(3)), ExitKind::NonZero(3));
        assert_eq!(
            ExitKind::from(Termination::Signaled(SIGKILL)),
            ExitKind::Killed(SIGKILL)
        );
        assert_eq!(ExitKind::from(Termination::TimedOut), ExitKind::TimedOut);
    }

    #[test]
    fn artifact_name_has_millisecond_timestamp_and_suffix() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap() + Duration::milliseconds(42);
        assert_eq!(
            artifact_file_name(&at, Tool::Uncover),
            "20240305070809042-uncover.txt"
        );
        assert_eq!(
            artifact_file_name(&at, Tool::Alterx),
            "20240305070809042-alterx.txt"
        );
    }

    #[test]
    fn artifact_names_one_millisecond_apart_differ() {
        let first = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let second = first + Duration::milliseconds(1);
        assert_ne!(
            artifact_file_name(&first, Tool::Uncover),
            artifact_file_name(&second, Tool::Uncover)
        );
    }
}
