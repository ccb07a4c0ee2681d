#[cfg(test)]
#[path = "tests/profile.rs"]
mod tests;

use core::fmt;
use core::ops::Deref;
use core::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity key of a profile record.
///
/// Never empty. Once a record is created with a key, the key is not
/// reassigned: edits to the local profile keep the key they started with.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileId(String);

impl ProfileId {
    /// Generates a fresh random identity key.
    #[must_use]
    pub fn random() -> Self {
        Self(hex::encode(rand::random::<[u8; 16]>()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for ProfileId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("profile identity key must not be empty")]
pub struct InvalidProfileId;

impl TryFrom<String> for ProfileId {
    type Error = InvalidProfileId;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        if id.trim().is_empty() {
            return Err(InvalidProfileId);
        }

        Ok(Self(id))
    }
}

impl FromStr for ProfileId {
    type Err = InvalidProfileId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.to_owned().try_into()
    }
}

impl From<ProfileId> for String {
    fn from(id: ProfileId) -> Self {
        id.0
    }
}

/// The identity record advertised by the local device and collected from
/// nearby ones.
///
/// The field names on the wire (`userId`, `profilePicUri`, ...) are the ones
/// every peer expects, so they are pinned by the serde attributes below.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(rename = "userId")]
    pub id: ProfileId,
    pub name: String,
    pub bio: String,
    pub interests: Vec<String>,
    #[serde(default)]
    pub profile_pic_uri: Option<String>,
    pub is_current_user: bool,
    /// Epoch milliseconds.
    pub discovery_timestamp: u64,
}

impl ProfileRecord {
    #[must_use]
    pub fn new(id: ProfileId, name: String, bio: String, interests: Vec<String>) -> Self {
        Self {
            id,
            name,
            bio,
            interests,
            profile_pic_uri: None,
            is_current_user: false,
            discovery_timestamp: now_millis(),
        }
    }

    #[must_use]
    pub fn with_picture_uri(mut self, uri: Option<String>) -> Self {
        self.profile_pic_uri = uri;
        self
    }

    #[must_use]
    pub const fn with_discovery_timestamp(mut self, timestamp: u64) -> Self {
        self.discovery_timestamp = timestamp;
        self
    }

    /// Marks the record as the local device's own.
    #[must_use]
    pub const fn into_local(mut self) -> Self {
        self.is_current_user = true;
        self
    }

    /// Stamps a record received from a peer as discovered at `received_at`.
    ///
    /// Peers advertise their own record with `is_current_user` set; on this
    /// device it describes somebody else, so the flag is cleared.
    #[must_use]
    pub const fn into_discovered(mut self, received_at: u64) -> Self {
        self.is_current_user = false;
        self.discovery_timestamp = received_at;
        self
    }
}

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}
