use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use const_format::concatcp;
use eyre::{bail, Result as EyreResult};
use nearby_config::ConfigFile;
use nearby_store::config::StoreConfig;
use nearby_store::db::RocksDB;
use nearby_store::profile::ProfileStore;
use nearby_store::Store;

use crate::defaults;

mod discovered;
mod init;
mod profile;
mod simulate;

use discovered::DiscoveredCommand;
use init::InitCommand;
use profile::ProfileCommand;
use simulate::SimulateCommand;

pub const EXAMPLES: &str = r#"
  # Initialize a new home directory
  $ nearbyd --home data/ init

  # Create or edit the local profile
  $ nearbyd --home data/ profile set --name Alice --bio "Likes board games" --interests "chess, go"

  # Exchange profiles with simulated nearby devices
  $ nearbyd --home data/ simulate --peers 3

  # List everyone discovered so far, most recent first
  $ nearbyd --home data/ discovered list
"#;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(after_help = concatcp!(
    "Environment variables:\n",
    "  NEARBY_HOME    Directory for config and data\n\n",
    "Examples:",
    EXAMPLES
))]
pub struct RootCommand {
    #[command(flatten)]
    pub args: RootArgs,

    #[command(subcommand)]
    pub action: SubCommands,
}

#[derive(Debug, Subcommand)]
pub enum SubCommands {
    Init(InitCommand),
    Profile(ProfileCommand),
    Discovered(DiscoveredCommand),
    #[command(alias = "run")]
    Simulate(SimulateCommand),
}

#[derive(Debug, Parser)]
pub struct RootArgs {
    /// Directory for config and data
    #[arg(long, value_name = "PATH", default_value_t = defaults::default_home_dir())]
    #[arg(env = "NEARBY_HOME", hide_env_values = true)]
    pub home: Utf8PathBuf,
}

impl RootCommand {
    pub async fn run(self) -> EyreResult<()> {
        match self.action {
            SubCommands::Init(init) => init.run(&self.args),
            SubCommands::Profile(profile) => profile.run(&self.args),
            SubCommands::Discovered(discovered) => discovered.run(&self.args),
            SubCommands::Simulate(simulate) => simulate.run(&self.args).await,
        }
    }
}

impl RootArgs {
    /// Loads the configuration and opens the profile store it points at.
    pub fn open(&self) -> EyreResult<(ConfigFile, ProfileStore)> {
        if !ConfigFile::exists(&self.home) {
            bail!("Nearby is not initialized in {:?}", self.home);
        }

        let config = ConfigFile::load(&self.home)?;

        let store_config = StoreConfig::new(self.home.join(&config.datastore.path));
        let store = ProfileStore::open(Store::open::<RocksDB>(&store_config)?)?;

        Ok((config, store))
    }
}
