use strum::{AsRefStr, EnumIter};

/// Fixed keys the profile store persists under.
#[derive(Eq, Ord, Copy, Clone, Debug, PartialEq, PartialOrd, EnumIter, AsRefStr)]
pub enum Key {
    #[strum(serialize = "user_profile")]
    LocalProfile,
    #[strum(serialize = "discovered_profiles")]
    DiscoveredProfiles,
}

impl Key {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.as_ref().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_key_names() {
        let names: Vec<_> = Key::iter().map(|key| key.as_ref().to_owned()).collect();

        assert_eq!(names, vec!["user_profile", "discovered_profiles"]);
        assert_eq!(Key::LocalProfile.as_bytes(), b"user_profile");
    }
}
