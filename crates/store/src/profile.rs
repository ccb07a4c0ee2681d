#[cfg(test)]
#[path = "tests/profile.rs"]
mod tests;

use eyre::WrapErr;
use nearby_primitives::profile::{ProfileId, ProfileRecord};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::key::Key;
use crate::Store;

/// Owner of the local user's record and of every record discovered nearby.
///
/// Both are loaded once when the store is opened and written back to the
/// database after each mutation. The discovered set holds at most one record
/// per identity key; a newer record for a known key replaces the old one.
#[derive(Debug)]
pub struct ProfileStore {
    store: Store,
    local: Option<ProfileRecord>,
    discovered: Vec<ProfileRecord>,
}

impl ProfileStore {
    pub fn open(store: Store) -> eyre::Result<Self> {
        let local = load::<ProfileRecord>(&store, Key::LocalProfile)?;
        let discovered = load::<Vec<ProfileRecord>>(&store, Key::DiscoveredProfiles)?
            .unwrap_or_default();

        debug!(
            has_local = local.is_some(),
            discovered = discovered.len(),
            "Opened profile store"
        );

        Ok(Self {
            store,
            local,
            discovered,
        })
    }

    #[must_use]
    pub const fn local_profile(&self) -> Option<&ProfileRecord> {
        self.local.as_ref()
    }

    #[must_use]
    pub const fn has_local_profile(&self) -> bool {
        self.local.is_some()
    }

    /// Overwrites the local record. The record is always flagged as the
    /// current user's.
    pub fn set_local_profile(&mut self, record: ProfileRecord) -> eyre::Result<()> {
        let record = record.into_local();

        let bytes = serde_json::to_vec(&record)?;
        self.store.put(Key::LocalProfile, &bytes)?;

        debug!(id=%record.id, "Saved local profile");

        self.local = Some(record);

        Ok(())
    }

    /// Replaces any record under the same key. Memory is left untouched when
    /// the write fails.
    pub fn upsert_discovered(&mut self, mut record: ProfileRecord) -> eyre::Result<()> {
        record.is_current_user = false;

        debug!(id=%record.id, "Storing discovered profile");

        let mut discovered: Vec<_> = self
            .discovered
            .iter()
            .filter(|existing| existing.id != record.id)
            .cloned()
            .collect();

        discovered.push(record);

        let bytes = serde_json::to_vec(&discovered)?;
        self.store.put(Key::DiscoveredProfiles, &bytes)?;

        self.discovered = discovered;

        Ok(())
    }

    /// All discovered records, most recently discovered first.
    #[must_use]
    pub fn list_discovered(&self) -> Vec<ProfileRecord> {
        let mut records = self.discovered.clone();

        records.sort_by(|a, b| b.discovery_timestamp.cmp(&a.discovery_timestamp));

        records
    }

    #[must_use]
    pub fn get_discovered(&self, id: &ProfileId) -> Option<&ProfileRecord> {
        self.discovered.iter().find(|record| &record.id == id)
    }

    #[must_use]
    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    pub fn clear_discovered(&mut self) -> eyre::Result<()> {
        self.store.delete(Key::DiscoveredProfiles)?;

        self.discovered.clear();

        debug!("Cleared discovered profiles");

        Ok(())
    }
}

fn load<T: DeserializeOwned>(store: &Store, key: Key) -> eyre::Result<Option<T>> {
    let Some(bytes) = store.get(key)? else {
        return Ok(None);
    };

    let value = serde_json::from_slice(&bytes)
        .wrap_err_with(|| format!("corrupt value stored under {:?}", key.as_ref()))?;

    Ok(Some(value))
}
