//! Saved-location state for SkyCast.
//!
//! `LocationStore` keeps the ordered, deduplicated list of fetched locations,
//! the bounded search history, the favorites set and the dark-mode flag, and
//! persists each of them under its own key in a [`KeyValueStore`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use skycast_store::{LocationStore, MemoryStorage};
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let mut store = LocationStore::load(storage.clone());
//! store.record_search("London");
//! store.record_search("Paris");
//! store.record_search("london");
//! assert_eq!(store.history(), ["london", "Paris"]);
//! store.save()?;
//!
//! let restored = LocationStore::load(storage);
//! assert_eq!(restored.history(), ["london", "Paris"]);
//! # Ok::<(), skycast_store::StorageError>(())
//! ```

mod error;
mod location_store;
mod seed;
mod sqlite;
mod storage;

pub use error::{Result, StorageError};
pub use location_store::{keys, FavoriteSet, Location, LocationStore, StoreSnapshot, MAX_HISTORY};
pub use seed::{seed_locations, SeedReport, DEFAULT_SEED_CITIES};
pub use sqlite::SqliteStorage;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
