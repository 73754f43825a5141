//! CLI module graph.

pub mod banner;
pub mod check;
pub mod command;
pub mod mappings;
pub mod output;
pub mod serve;

pub use command::{CheckCommand, Cli, Commands};

use crate::error::Result;

/// Dispatch a parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve(args) => serve::execute(&args).await,
        Commands::Check(CheckCommand::Config(arg)) => check::execute_config(&arg.config),
        Commands::Mappings(arg) => mappings::execute(&arg.config),
    }
}
