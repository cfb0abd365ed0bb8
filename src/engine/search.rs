//! Debounce timers and place-search tasks for the three slots.
//!
//! Each edit restarts the slot's quiet-period timer. When a timer survives
//! the full interval it dispatches `DebounceElapsed`; the reducer decides
//! whether that turns into a search. Searches themselves are fire-and-forget:
//! a superseded search still runs, and its completion is dropped by sequence
//! number when it lands.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::task::AbortHandle;

use crate::core::action::Action;
use crate::core::dispatch::Dispatcher;
use crate::core::geo::Region;
use crate::core::slot::SearchSlot;
use crate::services::PlaceSearch;

pub struct PlaceSearchEngine {
    places: Arc<dyn PlaceSearch>,
    dispatcher: Dispatcher,
    debounce: Duration,
    timers: [Option<AbortHandle>; 3],
}

impl PlaceSearchEngine {
    pub fn new(places: Arc<dyn PlaceSearch>, dispatcher: Dispatcher, debounce: Duration) -> Self {
        Self {
            places,
            dispatcher,
            debounce,
            timers: Default::default(),
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Restarts the quiet period for `slot`.
    pub fn start_debounce(&mut self, slot: SearchSlot, generation: u64) {
        if let Some(previous) = self.timers[slot.index()].take() {
            previous.abort();
        }
        let dispatcher = self.dispatcher.clone();
        let delay = self.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            dispatcher.send(Action::DebounceElapsed { slot, generation });
        });
        self.timers[slot.index()] = Some(handle.abort_handle());
    }

    pub fn spawn_search(&self, slot: SearchSlot, seq: u64, query: String, region: Option<Region>) {
        info!(
            "Spawning search for slot {} (seq={}, provider={}): {:?}",
            slot,
            seq,
            self.places.name(),
            query
        );
        let places = self.places.clone();
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            let results = match places.search(&query, region).await {
                Ok(results) => results,
                Err(e) => {
                    warn!("Search failed for slot {} ({:?}): {}", slot, query, e);
                    Vec::new()
                }
            };
            dispatcher.send(Action::SearchCompleted { slot, seq, results });
        });
    }

    pub fn cancel_timers(&mut self) {
        for timer in self.timers.iter_mut() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
    }
}
