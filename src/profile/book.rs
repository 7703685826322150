//! The set of study plans and which one is active

use uuid::Uuid;

use super::models::{Profile, ProfileBook, DEFAULT_PROFILE_NAME};

impl ProfileBook {
    /// A book holding a single active profile
    pub fn with_profile(profile: Profile) -> Self {
        Self {
            active_profile_id: profile.id,
            profiles: vec![profile],
        }
    }

    /// Repair a loaded book: guarantee one profile, a valid active id and
    /// consistent circuit flags. `starter` builds the profile used when the
    /// snapshot has none.
    pub fn normalize(&mut self, starter: impl FnOnce() -> Profile) {
        if self.profiles.is_empty() {
            log::warn!("Snapshot has no profiles, creating a starter plan");
            self.profiles.push(starter());
        }
        if self.profile(self.active_profile_id).is_none() {
            self.active_profile_id = self.profiles[0].id;
        }
        for profile in &mut self.profiles {
            profile.normalize();
        }
    }

    pub fn profile(&self, id: Uuid) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// The active profile, falling back to the first one. `None` only for a
    /// book with no profiles at all.
    pub fn active(&self) -> Option<&Profile> {
        self.profile(self.active_profile_id)
            .or_else(|| self.profiles.first())
    }

    /// The active profile for editing. An empty book gets a blank profile
    /// first.
    pub fn active_mut(&mut self) -> &mut Profile {
        if self.profiles.is_empty() {
            log::warn!("Profile book is empty, creating a blank profile");
            let profile = Profile::new(DEFAULT_PROFILE_NAME.to_string());
            self.active_profile_id = profile.id;
            self.profiles.push(profile);
        }
        let index = self
            .profiles
            .iter()
            .position(|p| p.id == self.active_profile_id)
            .unwrap_or(0);
        &mut self.profiles[index]
    }

    /// Add an empty profile and make it active
    pub fn create_profile(&mut self, name: String) -> Uuid {
        let profile = Profile::new(name);
        let id = profile.id;
        self.profiles.push(profile);
        self.active_profile_id = id;
        id
    }

    /// Remove a profile. The last profile cannot be removed; removing the
    /// active one activates the first that remains.
    pub fn delete_profile(&mut self, id: Uuid) -> bool {
        if self.profiles.len() <= 1 {
            log::debug!("Refusing to delete the only profile {}", id);
            return false;
        }
        let before = self.profiles.len();
        self.profiles.retain(|p| p.id != id);
        if self.profiles.len() == before {
            return false;
        }
        if self.active_profile_id == id {
            self.active_profile_id = self.profiles[0].id;
        }
        true
    }

    pub fn switch_to(&mut self, id: Uuid) -> bool {
        if self.profile(id).is_none() {
            return false;
        }
        self.active_profile_id = id;
        true
    }
}
