//! CLI layer: argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

pub use args::Cli;
pub use error::{CliError, CliResult};

use clap::error::ErrorKind;

use crate::config::Settings;
use crate::domain::Tool;
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;

/// Entry point shared by the runner binaries; returns the process exit code.
pub fn run(tool: Tool) -> i32 {
    let cli = match Cli::try_parse_for(tool, std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exitcode::OK,
                _ => exitcode::FAILURE,
            };
            // clap renders help to stdout and errors to stderr
            let _ = e.print();
            return code;
        }
    };

    logging::setup_logging(cli.debug);

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            output::error(&e);
            return exitcode::FAILURE;
        }
    };
    let container = ServiceContainer::new(settings);

    match commands::execute(&cli, tool, &container) {
        Ok(()) => exitcode::OK,
        Err(e) => {
            commands::report_error(tool, &e);
            e.exit_code()
        }
    }
}
