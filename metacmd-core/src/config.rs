//! Configuration system for metacmd.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> explicit config file -> environment.
//! Configuration is loaded from `<config dir>/metacmd/config.toml` and/or
//! `.metacmd/config.toml` in the workspace directory.
//!
//! Besides logging options, the configuration may declare additional meta
//! commands that are appended to the built-in registry:
//!
//! ```toml
//! [[commands]]
//! name = "explain"
//! section = "Query Execute"
//! desc = "explain the query buffer"
//! params = "[ANALYZE]"
//!
//! [[commands.aliases]]
//! key = "ex"
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::command::MetaCommand;
use crate::error::{ConfigError, RegistryError};
use crate::registry::CommandRegistry;
use crate::section::Section;

/// Directory name of the workspace-level configuration.
pub const WORKSPACE_DIR: &str = ".metacmd";
/// File name of every configuration layer.
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetacmdConfig {
    #[serde(default)]
    pub log: LogConfig,
    /// User-defined meta commands, appended after the built-ins.
    #[serde(default)]
    pub commands: Vec<CommandConfig>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive for stderr logging, e.g. `"info"` or
    /// `"metacmd_core=debug"`.
    pub level: String,
    /// Also write JSON logs to a daily rolling file in the data directory.
    pub json_file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_file: false,
        }
    }
}

/// A user-defined meta command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    pub name: String,
    pub section: Section,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub params: String,
    #[serde(default)]
    pub aliases: Vec<AliasConfig>,
}

/// An alias of a user-defined meta command. Leaving both `desc` and
/// `params` empty makes it a silent alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasConfig {
    pub key: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub params: String,
}

impl From<&CommandConfig> for MetaCommand {
    fn from(config: &CommandConfig) -> Self {
        config.aliases.iter().fold(
            MetaCommand::new(
                config.name.clone(),
                config.section,
                config.desc.clone(),
                config.params.clone(),
            ),
            |cmd, alias| cmd.with_alias(alias.key.clone(), alias.desc.clone(), alias.params.clone()),
        )
    }
}

impl MetacmdConfig {
    /// Build the registry: built-in commands followed by configured ones.
    pub fn build_registry(&self) -> Result<CommandRegistry, RegistryError> {
        let mut registry = CommandRegistry::with_defaults();
        for command in &self.commands {
            registry.register(command.into())?;
        }
        if !self.commands.is_empty() {
            tracing::debug!(
                configured = self.commands.len(),
                total = registry.len(),
                "Registered configured meta commands"
            );
        }
        Ok(registry)
    }

    /// Serialize the configuration as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// User-level configuration file path, if a config directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "metacmd", "metacmd")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Workspace-level configuration file path.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(WORKSPACE_DIR).join(CONFIG_FILE)
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `METACMD_`)
/// 2. Explicit config file (`--config`)
/// 3. Workspace-local config (`.metacmd/config.toml`)
/// 4. User config (`~/.config/metacmd/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    explicit: Option<&Path>,
) -> Result<MetacmdConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(MetacmdConfig::default()));

    // User-level config
    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Explicit config file must exist
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(Box::new(figment::Error::from(format!(
                "configuration file not found: {}",
                path.display()
            ))));
        }
        figment = figment.merge(Toml::file_exact(path));
    }

    // Environment variables (METACMD_LOG__LEVEL, METACMD_LOG__JSON_FILE)
    figment = figment.merge(Env::prefixed("METACMD_").split("__"));

    figment.extract().map_err(Box::new)
}

/// Check whether any metacmd configuration file exists (user-level or
/// workspace-level).
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if user_config_path().is_some_and(|path| path.exists()) {
        return true;
    }
    workspace.is_some_and(|ws| workspace_config_path(ws).exists())
}
