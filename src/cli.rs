// Command-line surface
//
// No subcommand runs the dashboard TUI. `report` is the one-shot workspace
// report job; `config` manages the config file.

use crate::config::{Config, VERSION};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fluxboard - terminal dashboard for project/CRM administration
#[derive(Parser)]
#[command(name = "fluxboard")]
#[command(version = VERSION)]
#[command(about = "Terminal dashboard for project/CRM administration", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the static HTML workspace report and exit
    Report {
        /// Output path (defaults to the configured report.output)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Handle the `config` subcommand.
pub fn handle_config(show: bool, path: bool, reset: bool) {
    if path {
        println!("{}", Config::config_path().display());
    } else if show {
        let config = Config::load();
        println!("# Effective configuration (env > file > defaults)");
        println!();
        print!("{}", config.to_toml());
        println!();
        let config_path = Config::config_path();
        if config_path.exists() {
            println!("# Source: {}", config_path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    } else if reset {
        let config_path = Config::config_path();
        if let Some(parent) = config_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error creating config directory: {}", e);
                std::process::exit(1);
            }
        }
        if let Err(e) = std::fs::write(&config_path, Config::default().to_toml()) {
            eprintln!("Error writing config: {}", e);
            std::process::exit(1);
        }
        println!("Config reset to defaults: {}", config_path.display());
    } else {
        println!("Usage: fluxboard config [--show|--path|--reset]");
    }
}
