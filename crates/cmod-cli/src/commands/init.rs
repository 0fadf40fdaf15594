//! Init command
//!
//! Create a cmod configuration file and data directory.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;

use cmod_core::config::Config;

use super::GlobalOptions;

/// Arguments for the init command
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

/// Execute the init command
pub fn execute(args: InitArgs, opts: &GlobalOptions) -> Result<()> {
    let config_path = &opts.config_path;

    if config_path.exists() && !args.force {
        eprintln!(
            "{} {} already exists. Use --force to overwrite.",
            "⚠".yellow(),
            config_path.display()
        );
        return Ok(());
    }

    let mut config = Config::default();
    if let Some(data_dir) = &opts.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    config
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("{} Wrote {}", "✓".green(), config_path.display());

    fs::create_dir_all(&config.storage.data_dir).with_context(|| {
        format!(
            "Failed to create data directory {}",
            config.storage.data_dir.display()
        )
    })?;
    println!(
        "{} Data directory {}",
        "✓".green(),
        config.storage.data_dir.display()
    );

    println!("\n{}", "Next steps:".bold());
    println!("  1. Adjust [validation] in {}", config_path.display());
    println!(
        "  2. Register content: {}",
        "cmod content add 1 --type BlogPost --title \"Hello\"".cyan()
    );
    println!(
        "  3. Review the queue: {}",
        "cmod comment list --status pending".cyan()
    );

    Ok(())
}
