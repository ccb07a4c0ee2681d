use serde::{Deserialize, Serialize};

use crate::profile::ProfileRecord;

/// Outcome of the discovery process delivered to the listener.
///
/// Either a freshly received profile or a human-readable description of a
/// terminal failure. There is no variant carrying both.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "PascalCase")]
pub enum DiscoveryEvent {
    DiscoveredProfile(ProfileRecord),
    Error(String),
}

impl DiscoveryEvent {
    #[must_use]
    pub const fn profile(&self) -> Option<&ProfileRecord> {
        match self {
            Self::DiscoveredProfile(record) => Some(record),
            Self::Error(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::DiscoveredProfile(_) => None,
            Self::Error(message) => Some(message),
        }
    }
}
