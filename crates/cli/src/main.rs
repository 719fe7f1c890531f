//! amalgam CLI — the main entry point.
//!
//! Commands:
//! - `build`       — Assemble every library in `amalgam.toml`
//! - `assemble`    — Assemble one library given on the command line
//! - `check`       — Verify that every configured input is readable
//! - `init`        — Write a starter `amalgam.toml`
//! - `config`      — Show, locate, or validate the configuration
//! - `completions` — Print shell completions

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "amalgam",
    about = "amalgam — bundle a multi-file C library into a single header",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./amalgam.toml)
    #[arg(short, long, global = true, value_name = "PATH", env = "AMALGAM_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the configured libraries
    Build {
        /// Only build these libraries (repeatable)
        #[arg(short, long = "library", value_name = "NAME")]
        libraries: Vec<String>,

        /// Write through a temp file and rename on success
        #[arg(long)]
        atomic: bool,

        /// Print build reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assemble a single library without a config file
    Assemble(commands::assemble::AssembleArgs),

    /// Check that every configured input exists and is readable
    Check,

    /// Write a starter amalgam.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the resolved configuration
    Show {
        /// Print resolved assembly plans as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the config file path
    Path,
    /// Validate the configuration
    Validate,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for artifacts and reports
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Build {
            libraries,
            atomic,
            json,
        } => commands::build::run(config, &libraries, atomic, json)?,
        Commands::Assemble(args) => commands::assemble::run(args)?,
        Commands::Check => commands::check::run(config)?,
        Commands::Init { force } => commands::init::run(config, force)?,
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => commands::config_cmd::show(config, json)?,
            ConfigAction::Path => commands::config_cmd::path(config)?,
            ConfigAction::Validate => commands::config_cmd::validate(config)?,
        },
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "amalgam", &mut std::io::stdout());
        }
    }

    Ok(())
}
