//! In-memory collection of vehicle profiles

use std::collections::HashSet;

use super::{parse_profiles, write_profiles, ProfileError, VehicleProfile};
use crate::storage::Storage;

/// Configuration file holding all vehicle profiles
pub const CONFIG_FILE: &str = "cars.txt";

/// All known vehicle profiles plus the one currently selected
#[derive(Debug, Clone)]
pub struct ProfileCollection {
    profiles: Vec<VehicleProfile>,
    selected: usize,
}

impl ProfileCollection {
    /// Create a collection; the first profile is selected
    pub fn new(profiles: Vec<VehicleProfile>) -> Result<Self, ProfileError> {
        if profiles.is_empty() {
            return Err(ProfileError::Empty);
        }
        let mut ids = HashSet::new();
        for profile in &profiles {
            profile.validate()?;
            if !ids.insert(profile.id) {
                return Err(ProfileError::DuplicateId(profile.id));
            }
        }
        Ok(Self {
            profiles,
            selected: 0,
        })
    }

    /// Load profiles from the configuration store
    pub fn load(storage: &dyn Storage) -> Result<Self, ProfileError> {
        let content = storage.read_lines(CONFIG_FILE)?.join("\n");
        Self::new(parse_profiles(&content)?)
    }

    /// Load profiles, writing a default configuration if none exists yet
    pub fn load_or_init(storage: &mut dyn Storage) -> Result<Self, ProfileError> {
        if storage.exists(CONFIG_FILE) {
            return Self::load(storage);
        }

        tracing::info!("No {} found, creating default vehicle profile", CONFIG_FILE);
        let collection = Self::new(vec![VehicleProfile::default()])?;
        collection.save(storage)?;
        Ok(collection)
    }

    /// Write every profile to the configuration store
    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), ProfileError> {
        storage.write(CONFIG_FILE, &write_profiles(&self.profiles))?;
        Ok(())
    }

    /// All profiles in order
    pub fn profiles(&self) -> &[VehicleProfile] {
        &self.profiles
    }

    /// Number of profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Always false; a collection holds at least one profile
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profile by id
    pub fn get(&self, id: u32) -> Option<&VehicleProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Currently selected profile
    pub fn selected(&self) -> &VehicleProfile {
        &self.profiles[self.selected]
    }

    /// Select a profile by id
    pub fn select(&mut self, id: u32) -> Result<&VehicleProfile, ProfileError> {
        let index = self.index_of(id)?;
        self.selected = index;
        Ok(&self.profiles[index])
    }

    /// Add a profile under a fresh id (one above the highest in use)
    pub fn add(&mut self, mut profile: VehicleProfile) -> Result<u32, ProfileError> {
        profile.id = self.next_id();
        profile.validate()?;
        let id = profile.id;
        self.profiles.push(profile);
        Ok(id)
    }

    /// Replace the profile with the same id
    pub fn update(&mut self, profile: VehicleProfile) -> Result<(), ProfileError> {
        profile.validate()?;
        let index = self.index_of(profile.id)?;
        self.profiles[index] = profile;
        Ok(())
    }

    /// Remove a profile. The last remaining profile cannot be removed.
    pub fn remove(&mut self, id: u32) -> Result<VehicleProfile, ProfileError> {
        let index = self.index_of(id)?;
        if self.profiles.len() == 1 {
            return Err(ProfileError::Empty);
        }
        let removed = self.profiles.remove(index);
        if self.selected > index || self.selected >= self.profiles.len() {
            self.selected = self.selected.saturating_sub(1);
        }
        Ok(removed)
    }

    /// Id the next added profile receives
    pub fn next_id(&self) -> u32 {
        self.profiles.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    fn index_of(&self, id: u32) -> Result<usize, ProfileError> {
        self.profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or(ProfileError::UnknownId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Position, Wheel};
    use crate::storage::MemoryStorage;

    fn kart() -> VehicleProfile {
        VehicleProfile::new(
            0,
            "Kart",
            vec![Wheel::new("L", "Left", 150.0), Wheel::new("R", "Right", 150.0)],
            vec![Position::new("M", "Middle")],
        )
    }

    #[test]
    fn test_load_or_init_writes_default() {
        let mut storage = MemoryStorage::new();
        let collection = ProfileCollection::load_or_init(&mut storage).unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.selected().name, "Car 1");
        assert!(storage.exists(CONFIG_FILE));

        let reloaded = ProfileCollection::load(&storage).unwrap();
        assert_eq!(reloaded.profiles(), collection.profiles());
    }

    #[test]
    fn test_add_assigns_next_id() {
        let mut collection = ProfileCollection::new(vec![VehicleProfile::default()]).unwrap();
        let id = collection.add(kart()).unwrap();
        assert_eq!(id, 2);
        assert_eq!(collection.get(2).unwrap().name, "Kart");
        assert_eq!(collection.next_id(), 3);
    }

    #[test]
    fn test_select_update_remove() {
        let mut collection = ProfileCollection::new(vec![VehicleProfile::default()]).unwrap();
        let id = collection.add(kart()).unwrap();

        collection.select(id).unwrap();
        assert_eq!(collection.selected().name, "Kart");

        let mut edited = collection.get(id).unwrap().clone();
        edited.name = "Shifter Kart".into();
        collection.update(edited).unwrap();
        assert_eq!(collection.selected().name, "Shifter Kart");

        collection.remove(id).unwrap();
        assert_eq!(collection.selected().id, 1);
        assert!(matches!(collection.remove(1), Err(ProfileError::Empty)));
        assert!(matches!(collection.select(9), Err(ProfileError::UnknownId(9))));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = ProfileCollection::new(vec![VehicleProfile::default(), VehicleProfile::default()]);
        assert!(matches!(result, Err(ProfileError::DuplicateId(1))));
    }

    #[test]
    fn test_load_empty_store_is_error() {
        let mut storage = MemoryStorage::new();
        storage.write(CONFIG_FILE, "").unwrap();
        assert!(matches!(
            ProfileCollection::load(&storage),
            Err(ProfileError::Empty)
        ));
    }
}
