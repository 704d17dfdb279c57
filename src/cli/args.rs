//! CLI argument definitions using clap

use std::ffi::OsString;

use clap::{ArgAction, CommandFactory, FromArgMatches, Parser, ValueHint};

use crate::domain::Tool;

/// Run a reconnaissance tool against one target and save its output under outputs/
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    /// Domain or host (uncover) or subdomain list file (alterx)
    #[arg(value_hint = ValueHint::AnyPath)]
    pub target: Option<String>,
}

impl Cli {
    /// Binary name of the runner for `tool`.
    pub fn bin_name(tool: Tool) -> &'static str {
        match tool {
            Tool::Uncover => "uncover-run",
            Tool::Alterx => "alterx-run",
        }
    }

    /// Parse `args` (including argv[0]) for the runner of `tool`.
    pub fn try_parse_for<I, T>(tool: Tool, args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut cmd = Self::command()
            .name(Self::bin_name(tool))
            .about(format!(
                "Run {} against one target and save its output to a timestamped file",
                tool
            ));
        let matches = cmd.try_get_matches_from_mut(args)?;
        Self::from_arg_matches(&matches).map_err(|e| e.format(&mut cmd))
    }
}
