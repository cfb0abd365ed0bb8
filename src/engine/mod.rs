//! # Engine
//!
//! Turns the `Effect`s returned by the reducer into real work: timers,
//! HTTP calls and the location stream. Every task it spawns reports back
//! through the `Dispatcher`, never by touching state directly.
//!
//! ```text
//! Store::dispatch ──Effect──▶ Engine::run ──spawn──▶ tokio task
//!        ▲                                              │
//!        └──────────── UI loop ◀── Dispatcher ◀─ Action ┘
//! ```

pub mod location;
pub mod route;
pub mod search;

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::core::action::Effect;
use crate::core::config::ResolvedConfig;
use crate::core::dispatch::Dispatcher;
use crate::services::{Directions, LocationSource, PlaceSearch};

pub use location::LocationProvider;
pub use route::RouteCalculator;
pub use search::PlaceSearchEngine;

/// The external collaborators the engine talks to.
#[derive(Clone)]
pub struct Services {
    pub places: Arc<dyn PlaceSearch>,
    pub directions: Arc<dyn Directions>,
    pub location: Arc<dyn LocationSource>,
}

pub struct Engine {
    pub location: LocationProvider,
    pub search: PlaceSearchEngine,
    pub routes: RouteCalculator,
}

impl Engine {
    pub fn new(services: Services, dispatcher: Dispatcher, debounce: Duration) -> Self {
        Self {
            location: LocationProvider::new(services.location, dispatcher.clone()),
            search: PlaceSearchEngine::new(services.places, dispatcher.clone(), debounce),
            routes: RouteCalculator::new(services.directions, dispatcher),
        }
    }

    pub fn from_config(services: Services, dispatcher: Dispatcher, config: &ResolvedConfig) -> Self {
        Self::new(
            services,
            dispatcher,
            Duration::from_millis(config.debounce_ms),
        )
    }

    /// Carries out one effect. `None` and `Quit` are the caller's business.
    pub fn run(&mut self, effect: Effect) {
        match effect {
            Effect::StartDebounce { slot, generation } => {
                self.search.start_debounce(slot, generation);
            }
            Effect::SpawnSearch {
                slot,
                seq,
                query,
                region,
            } => {
                self.search.spawn_search(slot, seq, query, region);
            }
            Effect::StartLocationUpdates => self.location.start_updates(),
            Effect::SpawnRoute { seq, from, to, mode } => {
                self.routes.calculate_route(seq, from, to, mode);
            }
            other @ (Effect::None | Effect::Quit) => debug!("Engine ignoring {:?}", other),
        }
    }

    /// Stops timers and the location stream. In-flight HTTP calls are left to finish.
    pub fn shutdown(&mut self) {
        self.search.cancel_timers();
        self.location.stop();
    }
}
