//! Configuration management
//!
//! There is no config file. Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Environment variables: `RECON__*` prefix, `__` as nesting separator
//!    (e.g. `RECON__OUTPUT_DIR`, `RECON__UNCOVER__BINARY`, `RECON__ALTERX__TIMEOUT_SECS`)

use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

use crate::domain::{expand_env_vars, Tool};
use crate::infrastructure::{InfraError, InfraResult};

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "RECON";

/// Per-tool execution settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolSettings {
    /// Absolute path of the tool binary
    pub binary: PathBuf,
    /// Upper bound for a scan, in seconds
    pub timeout_secs: u64,
    /// Upper bound for the `-version` probe, in seconds
    pub check_timeout_secs: u64,
}

impl ToolSettings {
    /// Defaults for `tool`: `/go/bin/<tool>`, 300 s scan, 5 s probe.
    pub fn for_tool(tool: Tool) -> Self {
        Self {
            binary: PathBuf::from(tool.default_binary()),
            timeout_secs: 300,
            check_timeout_secs: 5,
        }
    }
}

/// Unified configuration for both tool runners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Directory receiving artifacts, relative to the working directory (default: outputs)
    pub output_dir: PathBuf,
    /// Isolated runtime directory whose presence is reported (default: venv)
    pub venv_dir: PathBuf,
    pub uncover: ToolSettings,
    pub alterx: ToolSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            venv_dir: PathBuf::from("venv"),
            uncover: ToolSettings::for_tool(Tool::Uncover),
            alterx: ToolSettings::for_tool(Tool::Alterx),
        }
    }
}

impl Settings {
    /// Settings of one tool.
    pub fn tool(&self, tool: Tool) -> &ToolSettings {
        match tool {
            Tool::Uncover => &self.uncover,
            Tool::Alterx => &self.alterx,
        }
    }

    fn tool_mut(&mut self, tool: Tool) -> &mut ToolSettings {
        match tool {
            Tool::Uncover => &mut self.uncover,
            Tool::Alterx => &mut self.alterx,
        }
    }

    /// Load defaults and apply `RECON__*` environment overrides.
    pub fn load() -> InfraResult<Self> {
        Self::load_from(environment())
    }

    /// Load defaults and apply overrides from the given environment source.
    pub fn load_from(env: Environment) -> InfraResult<Self> {
        let mut current = Self::apply_env_overrides(Self::default(), env)?;

        // Expand ~ and $VAR in path-like fields
        current.expand_paths();

        Ok(current)
    }

    /// Env vars replace values; they are explicit user overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> InfraResult<Self> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("venv_dir") {
            settings.venv_dir = PathBuf::from(val);
        }

        for tool in [Tool::Uncover, Tool::Alterx] {
            let name = tool.name();
            let target = settings.tool_mut(tool);
            if let Ok(val) = config.get_string(&format!("{name}.binary")) {
                target.binary = PathBuf::from(val);
            }
            // A present but malformed number is an error, not a silent default
            if let Some(val) = get_optional::<u64>(&config, &format!("{name}.timeout_secs"))? {
                target.timeout_secs = val;
            }
            if let Some(val) = get_optional::<u64>(&config, &format!("{name}.check_timeout_secs"))? {
                target.check_timeout_secs = val;
            }
        }

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    ///
    /// Handles `~`, `$VAR`, and `${VAR}` syntax.
    fn expand_paths(&mut self) {
        self.output_dir = expand_path(&self.output_dir);
        self.venv_dir = expand_path(&self.venv_dir);
        self.uncover.binary = expand_path(&self.uncover.binary);
        self.alterx.binary = expand_path(&self.alterx.binary);
    }
}

/// Process environment source for `RECON__*` variables.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn expand_path(path: &std::path::Path) -> PathBuf {
    PathBuf::from(expand_env_vars(path.to_string_lossy().as_ref()))
}

fn get_optional<T: serde::de::DeserializeOwned>(
    config: &Config,
    key: &str,
) -> InfraResult<Option<T>> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> InfraError {
    InfraError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;

    fn env_from(vars: &[(&str, &str)]) -> Environment {
        let map: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn given_no_env_vars_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(env_from(&[])).expect("load defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.output_dir, PathBuf::from("outputs"));
        assert_eq!(settings.uncover.binary, PathBuf::from("/go/bin/uncover"));
        assert_eq!(settings.alterx.binary, PathBuf::from("/go/bin/alterx"));
        assert_eq!(settings.uncover.timeout_secs, 300);
        assert_eq!(settings.alterx.check_timeout_secs, 5);
    }

    #[test]
    fn given_env_vars_when_loading_then_they_replace_defaults() {
        let settings = Settings::load_from(env_from(&[
            ("RECON__OUTPUT_DIR", "/tmp/scans"),
            ("RECON__UNCOVER__BINARY", "/opt/uncover"),
            ("RECON__ALTERX__TIMEOUT_SECS", "42"),
        ]))
        .expect("load with overrides");

        assert_eq!(settings.output_dir, PathBuf::from("/tmp/scans"));
        assert_eq!(settings.uncover.binary, PathBuf::from("/opt/uncover"));
        assert_eq!(settings.alterx.timeout_secs, 42);
        assert_eq!(settings.uncover.timeout_secs, 300);
        assert_eq!(settings.alterx.binary, PathBuf::from("/go/bin/alterx"));
    }

    #[test]
    fn given_malformed_timeout_when_loading_then_fails() {
        let result = Settings::load_from(env_from(&[("RECON__UNCOVER__TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn given_tilde_in_output_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            output_dir: PathBuf::from("~/scans"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let out = settings.output_dir.to_string_lossy();
        assert!(out.starts_with(&home), "output_dir should start with home dir: {}", out);
        assert!(!out.contains('~'), "output_dir should not contain tilde: {}", out);
    }

    #[test]
    fn given_tool_when_selecting_settings_then_returns_matching_profile() {
        let settings = Settings::default();
        assert_eq!(settings.tool(Tool::Uncover).binary, PathBuf::from("/go/bin/uncover"));
        assert_eq!(settings.tool(Tool::Alterx).binary, PathBuf::from("/go/bin/alterx"));
    }
}
