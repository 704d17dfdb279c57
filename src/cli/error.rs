//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::domain::Tool;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("Please provide a {} for {tool}", tool.target_label())]
    MissingTarget { tool: Tool },
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Infra(_) | CliError::MissingTarget { .. } => crate::exitcode::FAILURE,
        }
    }
}

impl From<crate::application::ApplicationError> for CliError {
    fn from(e: crate::application::ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}
