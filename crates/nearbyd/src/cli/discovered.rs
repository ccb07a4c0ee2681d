use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use eyre::Result as EyreResult;
use owo_colors::OwoColorize;
use tracing::info;

use crate::cli::profile::print_profile;
use crate::cli::RootArgs;

/// Inspect profiles received from nearby devices
#[derive(Debug, Parser)]
pub struct DiscoveredCommand {
    #[command(subcommand)]
    pub action: DiscoveredSubCommands,
}

#[derive(Debug, Subcommand)]
pub enum DiscoveredSubCommands {
    /// List discovered profiles, most recent first
    #[command(alias = "ls")]
    List,
    /// Forget every discovered profile
    Clear,
}

impl DiscoveredCommand {
    pub fn run(self, root_args: &RootArgs) -> EyreResult<()> {
        let (_config, mut store) = root_args.open()?;

        match self.action {
            DiscoveredSubCommands::List => {
                let records = store.list_discovered();

                if records.is_empty() {
                    println!("No profiles discovered yet");
                }

                for record in &records {
                    let seen = i64::try_from(record.discovery_timestamp)
                        .ok()
                        .and_then(DateTime::<Utc>::from_timestamp_millis)
                        .map_or_else(
                            || record.discovery_timestamp.to_string(),
                            |at| at.to_rfc3339(),
                        );

                    println!("{} {}", "seen".dimmed(), seen.dimmed());
                    print_profile(record);
                }
            }
            DiscoveredSubCommands::Clear => {
                let count = store.discovered_count();

                store.clear_discovered()?;

                info!(count, "Cleared discovered profiles");
            }
        }

        Ok(())
    }
}
