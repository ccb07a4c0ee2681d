use std::fs::{read_to_string, write};

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result as EyreResult, WrapErr};
use nearby_network::config::NetworkConfig;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct ConfigFile {
    #[serde(default)]
    pub network: NetworkConfig,

    pub datastore: DataStoreConfig,
}

#[derive(Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct DataStoreConfig {
    pub path: Utf8PathBuf,
}

impl DataStoreConfig {
    #[must_use]
    pub const fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl ConfigFile {
    #[must_use]
    pub const fn new(network: NetworkConfig, datastore: DataStoreConfig) -> Self {
        Self { network, datastore }
    }

    #[must_use]
    pub fn exists(dir: &Utf8Path) -> bool {
        dir.join(CONFIG_FILE).is_file()
    }

    pub fn load(dir: &Utf8Path) -> EyreResult<Self> {
        let path = dir.join(CONFIG_FILE);
        let content = read_to_string(&path)
            .wrap_err_with(|| format!("failed to read configuration from {path:?}"))?;

        toml::from_str(&content).map_err(Into::into)
    }

    pub fn save(&self, dir: &Utf8Path) -> EyreResult<()> {
        let path = dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)?;

        write(&path, content)
            .wrap_err_with(|| format!("failed to write configuration to {path:?}"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let dir = Utf8Path::from_path(dir.path()).unwrap();

        assert!(!ConfigFile::exists(dir));

        let config = ConfigFile::new(
            NetworkConfig::default(),
            DataStoreConfig::new(dir.join("data")),
        );
        config.save(dir).unwrap();

        assert!(ConfigFile::exists(dir));

        let loaded = ConfigFile::load(dir).unwrap();
        assert_eq!(loaded.network, config.network);
        assert_eq!(loaded.datastore.path, dir.join("data"));
    }

    #[test]
    fn test_network_section_is_optional() {
        let config: ConfigFile = toml::from_str(
            r#"
            [datastore]
            path = "/tmp/nearby"
            "#,
        )
        .unwrap();

        assert_eq!(config.network.service_name, "profile_share");
        assert_eq!(config.datastore.path, "/tmp/nearby");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let dir = Utf8Path::from_path(dir.path()).unwrap();

        assert!(ConfigFile::load(dir).is_err());
    }
}
