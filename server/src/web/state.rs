use crate::geolocation::LocationSource;
use geomarkcore::prelude::StoreResult;
use geomarkcore::telemetry::MetricsRecorder;
use geomarkcore::{Coordinates, LocationStore, MapRenderer, MapView, SaveOutcome, SavedLocation};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Shared state behind every route.
///
/// Only the last looked-up location is held in memory; saved locations are
/// always reloaded from the store.
pub struct AppState {
    store: LocationStore,
    renderer: Box<dyn MapRenderer>,
    source: LocationSource,
    last_location: RwLock<Option<Coordinates>>,
    /// Set by the form refresh so the page it redirects to reuses the lookup.
    refreshed: AtomicBool,
    metrics: MetricsRecorder,
}

impl AppState {
    pub fn new(
        store: LocationStore,
        renderer: Box<dyn MapRenderer>,
        source: LocationSource,
    ) -> Self {
        Self {
            store,
            renderer,
            source,
            last_location: RwLock::new(None),
            refreshed: AtomicBool::new(false),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    pub fn renderer(&self) -> &dyn MapRenderer {
        self.renderer.as_ref()
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Runs one lookup and remembers its result for later saves.
    pub async fn refresh_location(&self) -> Option<Coordinates> {
        let location = self.source.current_location().await;
        self.metrics.record_lookup(location.is_some());
        if let Ok(mut guard) = self.last_location.write() {
            *guard = location;
        }
        location
    }

    /// Looks up the location for the next page render.
    pub async fn refresh_for_next_page(&self) {
        self.refresh_location().await;
        self.refreshed.store(true, Ordering::SeqCst);
    }

    /// The location a page render should show: the pending refresh result
    /// if there is one, otherwise a new lookup.
    pub async fn page_location(&self) -> Option<Coordinates> {
        if self.refreshed.swap(false, Ordering::SeqCst) {
            self.last_location()
        } else {
            self.refresh_location().await
        }
    }

    pub fn last_location(&self) -> Option<Coordinates> {
        self.last_location
            .read()
            .map(|guard| *guard)
            .unwrap_or(None)
    }

    /// Saves the last looked-up location under `name`.
    pub fn save(&self, name: &str) -> StoreResult<SaveOutcome> {
        let outcome = self.store.save(name, self.last_location())?;
        if matches!(outcome, SaveOutcome::Saved(_)) {
            self.metrics.record_save();
        }
        Ok(outcome)
    }

    /// Reloads the store and merges it with `current`.
    pub fn compose(
        &self,
        current: Option<Coordinates>,
    ) -> StoreResult<(MapView, Vec<SavedLocation>)> {
        let saved = self.store.load()?;
        Ok((MapView::compose(current, &saved), saved))
    }
}
