//! metacmd CLI: print and query the meta command listing of the interactive
//! SQL shell.

mod commands;

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// metacmd: backslash meta command help and lookup
#[derive(Parser, Debug)]
#[command(name = "metacmd", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (for `.metacmd/config.toml`)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress everything but errors on stderr
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Subcommand (prints the listing if omitted)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Commands {
    /// Print the sectioned meta command listing
    Help,
    /// Resolve a meta command by name or alias
    Lookup {
        /// Command name or alias, with or without the leading backslash
        name: String,
        /// Print the command as JSON
        #[arg(long)]
        json: bool,
    },
    /// List command names and aliases starting with a prefix
    Complete {
        /// Prefix, with or without the leading backslash
        #[arg(default_value = "")]
        prefix: String,
    },
    /// List section names in display order
    Sections,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum ConfigAction {
    /// Create a default configuration file in the workspace
    Init,
    /// Show the effective configuration
    Show,
}

fn init_tracing(cli: &Cli, config: &metacmd_core::MetacmdConfig) {
    let level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => config.log.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = if cli.verbose == 0 && !cli.quiet {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    // Human-readable layer for stderr (always active)
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    // Optional JSON file layer for structured logging
    let json_layer = config.log.json_file.then(|| {
        let log_dir = directories::ProjectDirs::from("dev", "metacmd", "metacmd")
            .map(|d| d.data_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("."));
        let _ = std::fs::create_dir_all(&log_dir);
        let file_appender = tracing_appender::rolling::daily(&log_dir, "metacmd.log");
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_filter(EnvFilter::new("debug"))
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();
}

/// Resolve the workspace directory. `config init` creates a missing
/// workspace; every other command requires it to exist.
fn resolve_workspace(path: &Path, create: bool) -> anyhow::Result<PathBuf> {
    if create {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create workspace {}", path.display()))?;
    }
    path.canonicalize()
        .with_context(|| format!("Workspace directory not found: {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let creates_workspace = matches!(
        cli.command,
        Some(Commands::Config {
            action: ConfigAction::Init
        })
    );
    let workspace = resolve_workspace(&cli.workspace, creates_workspace)?;

    let config = metacmd_core::load_config(Some(&workspace), cli.config.as_deref())
        .map_err(metacmd_core::ConfigError::from)?;

    init_tracing(&cli, &config);
    if cli.config.is_none() && !metacmd_core::config_exists(Some(&workspace)) {
        tracing::debug!("No configuration file found, using built-in defaults");
    }
    tracing::debug!(
        workspace = %workspace.display(),
        configured_commands = config.commands.len(),
        "Loaded configuration"
    );

    let command = cli.command.unwrap_or(Commands::Help);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::handle_command(command, &config, &workspace, &mut out)
}
