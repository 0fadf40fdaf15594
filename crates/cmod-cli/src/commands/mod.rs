//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod comment;
pub mod config;
pub mod content;
pub mod init;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cmod_core::comment::{CommentService, RuleValidator};
use cmod_core::config::Config;
use cmod_storage::{default_data_dir, FileSystemStorage};

/// Default location of the project configuration file
pub const DEFAULT_CONFIG_PATH: &str = ".cmod/config.toml";

/// cmod - moderate comments on content items
#[derive(Debug, Parser)]
#[command(name = "cmod")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CMOD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data directory (overrides storage.data_dir from the configuration)
    #[arg(long, global = true, env = "CMOD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a configuration file and data directory
    Init(init::InitArgs),

    /// List, create and moderate comments
    #[command(subcommand)]
    Comment(comment::CommentCommand),

    /// Manage content items and their comment settings
    #[command(subcommand)]
    Content(content::ContentCommand),

    /// Inspect configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Global options every command needs to locate config and data
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub config_path: PathBuf,
    pub data_dir: Option<PathBuf>,
}

impl GlobalOptions {
    /// Load the configuration file (defaults if it does not exist)
    pub fn load_config(&self) -> Result<Config> {
        Config::load(&self.config_path)
            .with_context(|| format!("Failed to load config {}", self.config_path.display()))
    }

    /// Data directory: command line first, then the configuration file, then
    /// the per-user data directory when no configuration file exists
    pub fn resolve_data_dir(&self, config: &Config) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None if self.config_path.exists() => config.storage.data_dir.clone(),
            None => default_data_dir(),
        }
    }
}

/// Everything a command needs to talk to the comment service
pub struct AppContext {
    pub config: Config,
    pub storage: FileSystemStorage,
    pub service: CommentService,
}

impl AppContext {
    /// Load configuration and open storage
    pub fn open(opts: &GlobalOptions) -> Result<Self> {
        let config = opts.load_config()?;
        let data_dir = opts.resolve_data_dir(&config);
        let storage = FileSystemStorage::new(&data_dir)
            .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;

        let validator = Arc::new(RuleValidator::from_config(&config.validation));
        let service = storage.comment_service(validator);
        tracing::debug!("Opened data directory {}", storage.data_dir().display());

        Ok(Self {
            config,
            storage,
            service,
        })
    }
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let opts = GlobalOptions {
        config_path: cli
            .config
            .clone()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH).to_path_buf()),
        data_dir: cli.data_dir.clone(),
    };

    // Dispatch to command handler
    match cli.command {
        Commands::Init(args) => init::execute(args, &opts),
        Commands::Comment(cmd) => comment::execute(cmd, &opts),
        Commands::Content(cmd) => content::execute(cmd, &opts),
        Commands::Config(cmd) => config::execute(cmd, &opts),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
