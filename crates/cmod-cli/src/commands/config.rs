//! Config command
//!
//! Inspect cmod configuration.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::GlobalOptions;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, opts: &GlobalOptions) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(opts, json),
        ConfigCommand::Path => {
            println!("{}", opts.config_path.display());
            Ok(())
        }
    }
}

fn show_config(opts: &GlobalOptions, as_json: bool) -> Result<()> {
    let mut config = opts.load_config()?;
    config.storage.data_dir = opts.resolve_data_dir(&config);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if opts.config_path.exists() {
        println!("{}", opts.config_path.display().to_string().dimmed());
    } else {
        println!(
            "{} {} not found, showing defaults. Run '{}' to create it.",
            "⚠".yellow(),
            opts.config_path.display(),
            "cmod init".cyan()
        );
    }
    println!();
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
