//! Saved locations, search history, favorites and preferences.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use skycast_weather::{CurrentReport, ForecastReport, WeatherSnapshot};
use uuid::Uuid;

use crate::error::Result;
use crate::storage::KeyValueStore;

/// Search history never holds more than this many entries
pub const MAX_HISTORY: usize = 10;

/// Storage keys, one per persisted slice. Changing these orphans saved data.
pub mod keys {
    pub const SEARCH_HISTORY: &str = "skycast.search_history";
    pub const FAVORITES: &str = "skycast.favorites";
    pub const DARK_MODE: &str = "skycast.dark_mode";
    pub const LOCATIONS: &str = "skycast.locations";
    pub const SEEDED: &str = "skycast.seeded";
}

/// One saved place and the weather last fetched for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    /// The search string as the user typed it
    pub city: String,
    pub weather: CurrentReport,
    pub forecast: ForecastReport,
    pub timestamp: DateTime<Utc>,
}

impl Location {
    /// Name the provider resolved the search to; favorites match on this.
    pub fn display_name(&self) -> &str {
        &self.weather.location.name
    }
}

/// Insertion-ordered set of favorite display names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FavoriteSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    /// Returns false if the name was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if !self.members.insert(name.to_string()) {
            return false;
        }
        self.order.push(name.to_string());
        true
    }

    /// Returns false if the name was not present.
    pub fn remove(&mut self, name: &str) -> bool {
        if !self.members.remove(name) {
            return false;
        }
        self.order.retain(|n| n != name);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl From<Vec<String>> for FavoriteSet {
    fn from(names: Vec<String>) -> Self {
        let mut set = Self::new();
        for name in names {
            set.insert(&name);
        }
        set
    }
}

impl From<FavoriteSet> for Vec<String> {
    fn from(set: FavoriteSet) -> Self {
        set.order
    }
}

/// Read-only copy of the store state handed to renderers
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub locations: Vec<Location>,
    pub favorite_locations: Vec<Location>,
    pub history: Vec<String>,
    pub favorites: Vec<String>,
    pub dark_mode: bool,
}

fn same_city(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Owner of all persisted location state.
///
/// Mutations are in-memory and never fail; call [`LocationStore::save`] to
/// write the current state back to storage.
pub struct LocationStore {
    storage: Arc<dyn KeyValueStore>,
    locations: Vec<Location>,
    history: Vec<String>,
    favorites: FavoriteSet,
    dark_mode: bool,
    seeded: bool,
}

impl LocationStore {
    /// Empty store backed by `storage`. Nothing is read.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            locations: Vec::new(),
            history: Vec::new(),
            favorites: FavoriteSet::new(),
            dark_mode: false,
            seeded: false,
        }
    }

    /// Restore every slice from `storage`.
    ///
    /// A missing, unreadable or corrupt slice comes back empty; the others
    /// are still restored.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self::new(storage);
        let storage = store.storage.as_ref();

        let locations: Vec<Location> = read_slice(storage, keys::LOCATIONS).unwrap_or_default();
        let history: Vec<String> = read_slice(storage, keys::SEARCH_HISTORY).unwrap_or_default();
        let favorites: FavoriteSet = read_slice(storage, keys::FAVORITES).unwrap_or_default();
        let dark_mode: bool = read_slice(storage, keys::DARK_MODE).unwrap_or(false);
        let seeded: bool = read_slice(storage, keys::SEEDED).unwrap_or(false);

        // Re-apply the invariants in case the stored data was edited by hand
        for location in locations {
            if !store.locations.iter().any(|l| same_city(&l.city, &location.city)) {
                store.locations.push(location);
            }
        }
        for city in history {
            if store.history.len() < MAX_HISTORY && !store.history.iter().any(|h| same_city(h, &city)) {
                store.history.push(city);
            }
        }
        store.favorites = favorites;
        store.dark_mode = dark_mode;
        // Data saved before the flag existed still counts as seeded
        store.seeded = seeded || !store.locations.is_empty();

        tracing::info!(
            "Loaded {} locations, {} history entries, {} favorites",
            store.locations.len(),
            store.history.len(),
            store.favorites.len()
        );
        store
    }

    /// Write every slice to storage, one key each.
    pub fn save(&self) -> Result<()> {
        self.write_slice(keys::LOCATIONS, &self.locations)?;
        self.write_slice(keys::SEARCH_HISTORY, &self.history)?;
        self.write_slice(keys::FAVORITES, &self.favorites)?;
        self.write_slice(keys::DARK_MODE, &self.dark_mode)?;
        self.write_slice(keys::SEEDED, &self.seeded)?;
        tracing::debug!("Saved location state");
        Ok(())
    }

    fn write_slice<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.storage.set(key, &raw)
    }

    /// Merge a fresh lookup result. Any entry for the same city (ignoring
    /// case) is dropped and the new one goes to the front.
    pub fn upsert(&mut self, city: &str, snapshot: WeatherSnapshot) -> Location {
        let location = Location {
            id: Uuid::new_v4().to_string(),
            city: city.to_string(),
            weather: snapshot.current,
            forecast: snapshot.forecast,
            timestamp: Utc::now(),
        };

        let before = self.locations.len();
        self.locations.retain(|l| !same_city(&l.city, city));
        if self.locations.len() < before {
            tracing::debug!("Replacing saved location for {}", city);
        }
        self.locations.insert(0, location.clone());
        self.record_search(city);

        location
    }

    /// Replace the weather of an existing location in place, keeping its id
    /// and position. History is not touched. Unknown ids are ignored.
    pub fn refresh(&mut self, id: &str, snapshot: WeatherSnapshot) -> Option<&Location> {
        let location = self.locations.iter_mut().find(|l| l.id == id)?;
        location.weather = snapshot.current;
        location.forecast = snapshot.forecast;
        location.timestamp = Utc::now();
        Some(&*location)
    }

    /// Move (or add) `city` to the front of the history, keeping at most
    /// [`MAX_HISTORY`] entries.
    pub fn record_search(&mut self, city: &str) {
        self.history.retain(|h| !same_city(h, city));
        self.history.insert(0, city.to_string());
        self.history.truncate(MAX_HISTORY);
    }

    /// Remove a location by id. Unknown ids are ignored.
    pub fn remove_location(&mut self, id: &str) -> Option<Location> {
        let index = self.locations.iter().position(|l| l.id == id)?;
        Some(self.locations.remove(index))
    }

    pub fn add_favorite(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        self.favorites.insert(name);
    }

    pub fn remove_favorite(&mut self, name: &str) {
        self.favorites.remove(name);
    }

    /// Flip favorite membership; returns whether `name` is now a favorite.
    pub fn toggle_favorite(&mut self, name: &str) -> bool {
        if self.favorites.contains(name) {
            self.favorites.remove(name);
            false
        } else {
            self.add_favorite(name);
            self.favorites.contains(name)
        }
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.contains(name)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Saved locations whose resolved name is a favorite, in display order.
    pub fn favorite_locations(&self) -> Vec<Location> {
        if self.favorites.is_empty() {
            return Vec::new();
        }
        self.locations
            .iter()
            .filter(|l| self.favorites.contains(l.display_name()))
            .cloned()
            .collect()
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.dark_mode = enabled;
    }

    /// Returns the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    /// True only on a first run: never seeded and nothing saved.
    pub fn needs_seed(&self) -> bool {
        !self.seeded && self.locations.is_empty()
    }

    pub fn mark_seeded(&mut self) {
        self.seeded = true;
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            locations: self.locations.clone(),
            favorite_locations: self.favorite_locations(),
            history: self.history.clone(),
            favorites: self.favorites.iter().map(str::to_string).collect(),
            dark_mode: self.dark_mode,
        }
    }
}

impl std::fmt::Debug for LocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationStore")
            .field("locations", &self.locations.len())
            .field("history", &self.history)
            .field("favorites", &self.favorites)
            .field("dark_mode", &self.dark_mode)
            .field("seeded", &self.seeded)
            .finish_non_exhaustive()
    }
}

fn read_slice<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Discarding corrupt {}: {}", key, e);
            None
        }
    }
}
