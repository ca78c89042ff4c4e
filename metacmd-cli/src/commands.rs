//! CLI subcommand handlers.

use std::io::Write;
use std::path::Path;

use metacmd_core::config::{self, WORKSPACE_DIR};
use metacmd_core::{CommandRegistry, ConfigError, MetaCommand, MetacmdConfig, Section};

use crate::{Commands, ConfigAction};

/// Handle a CLI subcommand, writing its output to `out`.
pub fn handle_command(
    command: Commands,
    config: &MetacmdConfig,
    workspace: &Path,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Help => {
            let registry = build_registry(config)?;
            registry.listing(&mut *out)?;
            out.flush()?;
            Ok(())
        }
        Commands::Lookup { name, json } => handle_lookup(&build_registry(config)?, &name, json, out),
        Commands::Complete { prefix } => {
            for completion in build_registry(config)?.completions(&prefix) {
                writeln!(out, "{completion}")?;
            }
            Ok(())
        }
        Commands::Sections => {
            for section in Section::all() {
                writeln!(out, "{section}")?;
            }
            Ok(())
        }
        Commands::Config { action } => handle_config(action, config, workspace, out),
    }
}

fn build_registry(config: &MetacmdConfig) -> Result<CommandRegistry, ConfigError> {
    Ok(config.build_registry()?)
}

fn handle_lookup(
    registry: &CommandRegistry,
    name: &str,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let Some(cmd) = registry.lookup(name) else {
        tracing::debug!(name, "Meta command lookup failed");
        return match registry.suggest(name) {
            Some(suggestion) => Err(anyhow::anyhow!(
                "Unknown meta command '{}'. Did you mean \\{}?",
                name,
                suggestion
            )),
            None => Err(anyhow::anyhow!("Unknown meta command '{}'", name)),
        };
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(cmd)?)?;
    } else {
        write_command(cmd, out)?;
    }
    Ok(())
}

fn write_command(cmd: &MetaCommand, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "\\{}{}", cmd.name, cmd.desc.params_suffix())?;
    writeln!(out, "  section: {}", cmd.section)?;
    if !cmd.desc.desc.is_empty() {
        writeln!(out, "  {}", cmd.desc.desc)?;
    }
    let names: Vec<_> = cmd
        .aliases
        .iter()
        .map(|alias| format!("\\{}", alias.name()))
        .filter(|name| name[1..] != cmd.name)
        .collect();
    if !names.is_empty() {
        writeln!(out, "  aliases: {}", names.join(", "))?;
    }
    Ok(())
}

fn handle_config(
    action: ConfigAction,
    config: &MetacmdConfig,
    workspace: &Path,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = config::workspace_config_path(workspace);
            if config_path.exists() {
                writeln!(
                    out,
                    "Configuration file already exists at: {}",
                    config_path.display()
                )?;
                return Ok(());
            }

            std::fs::create_dir_all(workspace.join(WORKSPACE_DIR))?;
            let toml_str = MetacmdConfig::default().to_toml_string()?;
            std::fs::write(&config_path, &toml_str)?;
            tracing::info!(path = %config_path.display(), "Created default configuration");
            writeln!(
                out,
                "Created default configuration at: {}",
                config_path.display()
            )?;
            Ok(())
        }
        ConfigAction::Show => {
            write!(out, "{}", config.to_toml_string()?)?;
            Ok(())
        }
    }
}
