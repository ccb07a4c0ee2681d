use std::fs::create_dir_all;

use camino::Utf8PathBuf;
use clap::Parser;
use eyre::{bail, Result as EyreResult, WrapErr};
use nearby_config::{ConfigFile, DataStoreConfig};
use nearby_network::config::NetworkConfig;
use nearby_store::config::StoreConfig;
use nearby_store::db::{Database, RocksDB};
use tracing::{info, warn};

use crate::cli::RootArgs;
use crate::defaults;

/// Initialize the home directory
#[derive(Debug, Parser)]
pub struct InitCommand {
    /// Discovery service name shared by every participating device
    #[arg(long, value_name = "NAME")]
    pub service_name: Option<String>,

    /// Datastore directory, relative to the home directory
    #[arg(long, value_name = "PATH", default_value = defaults::DEFAULT_DATASTORE_DIR)]
    pub datastore: Utf8PathBuf,

    /// Force overwrite an existing configuration
    #[arg(long, short)]
    pub force: bool,
}

impl InitCommand {
    pub fn run(self, root_args: &RootArgs) -> EyreResult<()> {
        let path = &root_args.home;

        if ConfigFile::exists(path) {
            if !self.force {
                bail!("Nearby is already initialized in {:?}", path);
            }

            warn!("Overriding config.toml file in {:?}", path);
        }

        create_dir_all(path).wrap_err_with(|| format!("failed to create directory {path:?}"))?;

        let mut network = NetworkConfig::default();

        if let Some(service_name) = self.service_name {
            network.service_name = service_name;
        }

        let config = ConfigFile::new(network, DataStoreConfig::new(self.datastore));

        drop(RocksDB::open(&StoreConfig::new(path.join(&config.datastore.path)))?);

        config.save(path)?;

        info!("Initialized nearby in {:?}", path);

        Ok(())
    }
}
