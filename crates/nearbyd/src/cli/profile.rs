use clap::{Parser, Subcommand};
use eyre::{bail, Result as EyreResult};
use nearby_primitives::draft::ProfileDraft;
use nearby_primitives::profile::ProfileRecord;
use owo_colors::OwoColorize;
use tracing::info;

use crate::cli::RootArgs;

/// Manage the local profile
#[derive(Debug, Parser)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub action: ProfileSubCommands,
}

#[derive(Debug, Subcommand)]
pub enum ProfileSubCommands {
    /// Create the local profile, or replace its fields
    Set(SetCommand),
    /// Print the local profile
    Show,
}

#[derive(Debug, Parser)]
pub struct SetCommand {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub bio: String,

    /// Comma separated, e.g. "chess, hiking"
    #[arg(long)]
    pub interests: String,

    #[arg(long, value_name = "URI")]
    pub picture: Option<String>,
}

impl ProfileCommand {
    pub fn run(self, root_args: &RootArgs) -> EyreResult<()> {
        let (_config, mut store) = root_args.open()?;

        match self.action {
            ProfileSubCommands::Set(set) => {
                let draft = ProfileDraft {
                    name: set.name,
                    bio: set.bio,
                    interests: set.interests,
                    picture_uri: set.picture,
                };

                let record = draft.into_local_profile(store.local_profile())?;

                info!(id=%record.id, "Saving local profile");

                store.set_local_profile(record.clone())?;

                print_profile(&record);
            }
            ProfileSubCommands::Show => {
                let Some(record) = store.local_profile() else {
                    bail!("No local profile yet, create one with `nearbyd profile set`");
                };

                print_profile(record);
            }
        }

        Ok(())
    }
}

pub fn print_profile(record: &ProfileRecord) {
    println!("{} {}", record.name.bold(), format!("({})", record.id).dimmed());
    println!("  {}", record.bio);
    println!("  {} {}", "interests:".cyan(), record.interests.join(", "));

    if let Some(uri) = &record.profile_pic_uri {
        println!("  {} {}", "picture:".cyan(), uri);
    }
}
