//! Handler for the `mappings` command.

use std::path::Path;

use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::app::build_relay;
use crate::config::Config;
use crate::error::Result;

#[derive(Tabled)]
struct MappingRow {
    #[tabled(rename = "Alias")]
    alias: String,
    #[tabled(rename = "Canonical")]
    canonical: String,
    #[tabled(rename = "Source")]
    source: &'static str,
}

/// Print the mapping table the server would start with.
pub fn execute<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let relay = build_relay(&config);
    let custom = relay.symbols().custom_mappings();

    let rows: Vec<MappingRow> = relay
        .mappings()
        .into_iter()
        .map(|(alias, canonical)| {
            let source = if custom.contains_key(&alias) {
                "runtime"
            } else if config
                .symbols
                .keys()
                .any(|extra| extra.trim().eq_ignore_ascii_case(&alias))
            {
                "config"
            } else {
                "built-in"
            };
            MappingRow {
                alias,
                canonical,
                source,
            }
        })
        .collect();

    let count = rows.len();
    output::section("Symbol mappings");
    println!("{}", Table::new(rows));
    output::field("Count", count);
    Ok(())
}
