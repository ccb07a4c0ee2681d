use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::{now_millis, ProfileId, ProfileRecord};

/// Raw, user-entered fields of the local profile before validation.
///
/// `interests` is the comma separated text as typed, e.g. `"chess, hiking"`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ProfileDraft {
    pub name: String,
    pub bio: String,
    pub interests: String,
    pub picture_uri: Option<String>,
}

#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum ProfileDraftError {
    #[error("Name is required")]
    MissingName,
    #[error("Bio is required")]
    MissingBio,
    #[error("Interests are required")]
    MissingInterests,
}

impl ProfileDraft {
    /// Validates the draft and turns it into the local profile record.
    ///
    /// The identity key of `existing` is carried over when present, a fresh one
    /// is generated otherwise.
    pub fn into_local_profile(
        self,
        existing: Option<&ProfileRecord>,
    ) -> Result<ProfileRecord, ProfileDraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProfileDraftError::MissingName);
        }

        let bio = self.bio.trim();
        if bio.is_empty() {
            return Err(ProfileDraftError::MissingBio);
        }

        let interests = parse_interests(&self.interests);
        if interests.is_empty() {
            return Err(ProfileDraftError::MissingInterests);
        }

        let picture_uri = self
            .picture_uri
            .map(|uri| uri.trim().to_owned())
            .filter(|uri| !uri.is_empty());

        let id = existing.map_or_else(ProfileId::random, |record| record.id.clone());

        Ok(
            ProfileRecord::new(id, name.to_owned(), bio.to_owned(), interests)
                .with_picture_uri(picture_uri)
                .with_discovery_timestamp(now_millis())
                .into_local(),
        )
    }
}

/// Splits comma separated interest text into trimmed, non-empty tags.
#[must_use]
pub fn parse_interests(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
