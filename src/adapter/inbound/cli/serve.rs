//! Handler for the `serve` command.

use tokio::signal;
use tracing::{info, warn};

use crate::adapter::inbound::cli::banner;
use crate::adapter::inbound::cli::command::ServeArgs;
use crate::app::App;
use crate::config::Config;
use crate::error::Result;

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(config: &mut Config, args: &ServeArgs) {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
}

/// Execute the serve command.
pub async fn execute(args: &ServeArgs) -> Result<()> {
    let mut config = Config::load_or_default(&args.config)?;
    apply_overrides(&mut config, args);
    config.init_logging();

    if !args.no_banner && !args.json_logs {
        banner::print_banner(&config.bind_addr());
    }

    info!(
        addr = %config.bind_addr(),
        snapshot = ?config.relay.snapshot_path(),
        "tvbridge starting"
    );

    App::run(config, async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    })
    .await?;

    info!("tvbridge stopped");
    Ok(())
}
