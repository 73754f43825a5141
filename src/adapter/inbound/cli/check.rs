//! Handler for `check config`.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::config::Config;
use crate::error::Result;

/// Validate configuration and environment without starting the server.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let exists = path.exists();

    let config = match Config::load_or_default(path) {
        Ok(config) => config,
        Err(e) => {
            output::error(&e.to_string());
            return Err(e);
        }
    };

    output::section("Configuration Check");
    if exists {
        output::field("Config", path.display());
        output::success("Configuration file is valid");
    } else {
        output::field("Config", "(defaults)");
        output::warning("Config file not found, using defaults");
    }
    output::success("BRIDGE_PASSWORD is set");

    output::section("Summary");
    output::field("Listen", config.bind_addr());
    output::field(
        "Logging",
        format!("{} ({})", config.logging.level, config.logging.format),
    );
    match config.relay.snapshot_path() {
        Some(snapshot) => output::field("Snapshot", snapshot.display()),
        None => output::field("Snapshot", "disabled"),
    }
    output::field("Default risk", config.relay.default_risk);
    output::field("Extra symbols", config.symbols.len());

    output::success("Configuration check complete");
    Ok(())
}
