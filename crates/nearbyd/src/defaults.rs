use camino::{Utf8Path, Utf8PathBuf};
use dirs::home_dir;

pub const DEFAULT_NEARBY_HOME: &str = ".nearby";
pub const DEFAULT_DATASTORE_DIR: &str = "data";

pub fn default_home_dir() -> Utf8PathBuf {
    if let Some(home) = home_dir().as_deref().and_then(Utf8Path::from_path) {
        return home.join(DEFAULT_NEARBY_HOME);
    }

    Utf8PathBuf::from(DEFAULT_NEARBY_HOME)
}
