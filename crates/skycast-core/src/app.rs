use std::sync::Arc;

use skycast_store::{seed_locations, Location, LocationStore, SeedReport, StoreSnapshot};
use skycast_weather::{FetchClient, WeatherLookup};

use crate::{AppError, Config};

/// Application state and command handling.
///
/// Every mutating command is followed by a save, and a failed lookup only
/// ever changes the error banner.
pub struct App {
    config: Arc<Config>,
    store: LocationStore,
    lookup: Arc<dyn WeatherLookup>,
    error_banner: Option<String>,
}

impl App {
    pub fn new(config: Config, store: LocationStore, lookup: Arc<dyn WeatherLookup>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            lookup,
            error_banner: None,
        }
    }

    /// Open storage and build the provider client described by `config`.
    ///
    /// A missing API key is not an error here: saved state stays usable
    /// offline and the provider rejects lookups made without one.
    pub fn open(config: Config) -> Result<Self, AppError> {
        if config.provider.api_key().is_none() {
            tracing::warn!("No API key configured; lookups will be rejected by the provider");
        }

        let storage = config.storage.open()?;
        let store = LocationStore::load(storage);
        let client = FetchClient::new(config.provider.settings())?;

        Ok(Self::new(config, store, Arc::new(client)))
    }

    /// Run the first-run seed if it is still pending, then persist.
    pub async fn start(&mut self) -> Result<SeedReport, AppError> {
        let report = seed_locations(
            &mut self.store,
            self.lookup.as_ref(),
            &self.config.seed.cities,
        )
        .await;

        if !report.skipped {
            self.persist()?;
        }
        tracing::info!(
            "Application started with {} saved locations",
            self.store.locations().len()
        );
        Ok(report)
    }

    /// Look up a city and merge the result into the saved locations.
    pub async fn search(&mut self, city: &str) -> Result<Location, AppError> {
        let city = city.trim();
        if city.is_empty() {
            let err = AppError::InvalidInput("Please enter a city name".to_string());
            self.error_banner = Some(err.user_message());
            return Err(err);
        }

        self.error_banner = None;
        let snapshot = match self.lookup.lookup(city).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Lookup for {} failed: {}", city, e);
                let err = AppError::from(e);
                self.error_banner = Some(err.user_message());
                return Err(err);
            }
        };

        let location = self.store.upsert(city, snapshot);
        tracing::info!("Saved {} as {}", city, location.display_name());
        self.persist()?;
        Ok(location)
    }

    /// Re-fetch every saved location in display order.
    ///
    /// Entries keep their id and position. Failed lookups leave the entry as
    /// it was; the banner shows the last failure. Returns how many refreshed.
    pub async fn refresh_all(&mut self) -> Result<usize, AppError> {
        let targets: Vec<(String, String)> = self
            .store
            .locations()
            .iter()
            .map(|l| (l.id.clone(), l.city.clone()))
            .collect();

        self.error_banner = None;
        let mut refreshed = 0;
        for (id, city) in targets {
            match self.lookup.lookup(&city).await {
                Ok(snapshot) => {
                    if self.store.refresh(&id, snapshot).is_some() {
                        refreshed += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!("Refresh of {} failed: {}", city, e);
                    self.error_banner = Some(e.message());
                }
            }
        }

        if refreshed > 0 {
            self.persist()?;
        }
        Ok(refreshed)
    }

    /// Returns whether anything was removed.
    pub fn remove_location(&mut self, id: &str) -> Result<bool, AppError> {
        let removed = self.store.remove_location(id).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Flip the favorite state of a saved location.
    ///
    /// Returns `None` for an unknown id, otherwise whether it is now a favorite.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<Option<bool>, AppError> {
        let Some(name) = self.store.location(id).map(|l| l.display_name().to_string()) else {
            return Ok(None);
        };
        let now_favorite = self.store.toggle_favorite(&name);
        self.persist()?;
        Ok(Some(now_favorite))
    }

    pub fn clear_history(&mut self) -> Result<(), AppError> {
        self.store.clear_history();
        self.persist()
    }

    pub fn toggle_dark_mode(&mut self) -> Result<bool, AppError> {
        let enabled = self.store.toggle_dark_mode();
        self.persist()?;
        Ok(enabled)
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<(), AppError> {
        self.store.set_dark_mode(enabled);
        self.persist()
    }

    fn persist(&mut self) -> Result<(), AppError> {
        if let Err(e) = self.store.save() {
            tracing::error!("Failed to save state: {}", e);
            let err = AppError::from(e);
            self.error_banner = Some(err.user_message());
            return Err(err);
        }
        Ok(())
    }

    /// Most recent failure, if not dismissed
    pub fn error_banner(&self) -> Option<&str> {
        self.error_banner.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error_banner = None;
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Flush state before exit
    pub fn shutdown(&mut self) -> Result<(), AppError> {
        tracing::info!("Shutting down");
        self.persist()
    }
}
