//! First-run seeding of saved locations.

use skycast_weather::WeatherLookup;

use crate::location_store::LocationStore;

/// Cities fetched on first run when nothing has been saved yet
pub const DEFAULT_SEED_CITIES: &[&str] = &["London", "Lagos", "Abuja", "Benin"];

/// Outcome of a seed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// True when seeding had already happened (or data existed) and nothing ran
    pub skipped: bool,
    pub seeded: Vec<String>,
    /// City and the error message it failed with
    pub failed: Vec<(String, String)>,
}

/// Fetch each seed city in order and merge the successes into `store`.
///
/// Runs at most once per store lifetime: once the seeded flag is set (or if
/// saved locations already exist) this returns immediately without any
/// lookups. A failing city is logged and skipped.
pub async fn seed_locations(
    store: &mut LocationStore,
    lookup: &dyn WeatherLookup,
    cities: &[String],
) -> SeedReport {
    if !store.needs_seed() {
        tracing::debug!("Seed skipped, saved state already present");
        return SeedReport {
            skipped: true,
            ..SeedReport::default()
        };
    }

    tracing::info!("Seeding {} default locations", cities.len());
    let mut report = SeedReport::default();

    // One at a time so the resulting order follows the seed list
    for city in cities {
        match lookup.lookup(city).await {
            Ok(snapshot) => {
                store.upsert(city, snapshot);
                report.seeded.push(city.clone());
            }
            Err(e) => {
                tracing::warn!("Seed lookup for {} failed: {}", city, e);
                report.failed.push((city.clone(), e.message()));
            }
        }
    }

    store.mark_seeded();
    tracing::info!(
        "Seeding finished: {} ok, {} failed",
        report.seeded.len(),
        report.failed.len()
    );
    report
}
