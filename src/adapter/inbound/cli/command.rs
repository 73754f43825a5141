//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Relay TradingView alerts to a polling MetaTrader expert advisor
#[derive(Parser, Debug)]
#[command(name = "tvbridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP relay (foreground)
    Serve(ServeArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Print the effective symbol mapping table
    Mappings(ConfigPathArg),
}

/// Subcommands for `tvbridge check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file and environment
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Path to configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Skip the startup banner
    #[arg(long)]
    pub no_banner: bool,
}
