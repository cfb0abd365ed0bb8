//! # Application State
//!
//! Every value the map renders from, in one place. Nothing in here knows
//! about the terminal or about HTTP.
//!
//! ```text
//! App
//! ├── slots: [SlotState; 3]        // per-slot query, debounce + results
//! ├── location: LocationState      // latest fix + authorization
//! ├── route: RouteState            // the single active route
//! ├── camera: Option<Region>       // visible window, set on first fix
//! ├── search_bias: SearchBias      // global or near-user search
//! ├── initial_region_m: f64        // size of the first camera window
//! └── revisions: Revisions         // change counters read by the Store
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use serde::{Deserialize, Serialize};

use crate::core::config::ResolvedConfig;
use crate::core::geo::{Coordinate, PlaceResult, Region, RouteGeometry, TravelMode};
use crate::core::slot::SearchSlot;

/// Size of the window the camera jumps to on the first location fix.
pub const DEFAULT_INITIAL_REGION_METERS: f64 = 5000.0;

/// Where a slot is in its query lifecycle.
///
/// ```text
/// Idle ──edit──▶ Debouncing ──quiet period──▶ Searching ──completion──▶ Idle
///                  ▲   │
///                  └───┘ further edits restart the quiet period
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotPhase {
    #[default]
    Idle,
    Debouncing,
    Searching,
}

#[derive(Debug, Clone, Default)]
pub struct SlotState {
    /// What the user has typed so far.
    pub query: String,
    /// Last text that made it through the debounce (None before the first one).
    pub last_submitted: Option<String>,
    pub results: Vec<PlaceResult>,
    pub phase: SlotPhase,
    /// Bumped on every edit; only the timer carrying the latest value counts.
    pub debounce_generation: u64,
    /// Bumped on every submission; only the completion carrying it is applied.
    pub search_seq: u64,
    /// The search issued with `search_seq` has not completed yet.
    pub in_flight: bool,
}

/// Permission state reported by the geolocation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationState {
    #[default]
    NotDetermined,
    Denied,
    Restricted,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

impl AuthorizationState {
    /// Whether location updates may be requested.
    pub fn is_authorized(&self) -> bool {
        matches!(
            self,
            AuthorizationState::AuthorizedWhenInUse | AuthorizationState::AuthorizedAlways
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuthorizationState::NotDetermined => "not determined",
            AuthorizationState::Denied => "denied",
            AuthorizationState::Restricted => "restricted",
            AuthorizationState::AuthorizedWhenInUse => "when in use",
            AuthorizationState::AuthorizedAlways => "always",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocationState {
    /// Most recent fix, overwritten on every update.
    pub current: Option<Coordinate>,
    pub authorization: AuthorizationState,
    /// True once `Effect::StartLocationUpdates` has been issued.
    pub updates_requested: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RouteState {
    /// Last successful route; survives failed recalculations.
    pub geometry: Option<RouteGeometry>,
    /// Bumped per requested calculation.
    pub seq: u64,
    /// A calculation with the latest `seq` has not completed yet.
    pub pending: bool,
    pub destination: Option<Coordinate>,
}

/// Whether place searches are scoped around the user.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SearchBias {
    #[default]
    Global,
    NearUser { radius_m: f64 },
}

/// Per-topic change counters. The store diffs these around every dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Revisions {
    pub location: u64,
    pub authorization: u64,
    pub queries: [u64; 3],
    pub results: [u64; 3],
    pub route: u64,
    pub camera: u64,
}

pub struct App {
    pub slots: [SlotState; 3],
    pub location: LocationState,
    pub route: RouteState,
    pub camera: Option<Region>,
    pub search_bias: SearchBias,
    pub travel_mode: TravelMode,
    pub initial_region_m: f64,
    pub revisions: Revisions,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            slots: Default::default(),
            location: LocationState::default(),
            route: RouteState::default(),
            camera: None,
            search_bias: SearchBias::Global,
            travel_mode: TravelMode::Automobile,
            initial_region_m: DEFAULT_INITIAL_REGION_METERS,
            revisions: Revisions::default(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let search_bias = if config.location_bias {
            SearchBias::NearUser {
                radius_m: config.bias_radius_m,
            }
        } else {
            SearchBias::Global
        };
        Self {
            search_bias,
            travel_mode: config.travel_mode,
            initial_region_m: config.initial_region_m,
            ..Self::new()
        }
    }

    pub fn slot(&self, slot: SearchSlot) -> &SlotState {
        &self.slots[slot.index()]
    }

    pub fn slot_mut(&mut self, slot: SearchSlot) -> &mut SlotState {
        &mut self.slots[slot.index()]
    }

    /// The region searches should be biased toward, if biasing is on and a fix exists.
    pub fn bias_region(&self) -> Option<Region> {
        match self.search_bias {
            SearchBias::Global => None,
            SearchBias::NearUser { radius_m } => self
                .location
                .current
                .map(|center| Region::around(center, radius_m * 2.0, radius_m * 2.0)),
        }
    }

    /// Number of slots with a search in flight.
    pub fn searches_in_flight(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.phase == SlotPhase::Searching)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(app.location.current.is_none());
        assert_eq!(app.location.authorization, AuthorizationState::NotDetermined);
        assert!(app.route.geometry.is_none());
        assert!(app.camera.is_none());
        assert_eq!(app.search_bias, SearchBias::Global);
        assert_eq!(app.travel_mode, TravelMode::Automobile);
        for slot in SearchSlot::ALL {
            assert!(app.slot(slot).results.is_empty());
            assert_eq!(app.slot(slot).phase, SlotPhase::Idle);
        }
    }

    #[test]
    fn test_bias_region_requires_fix() {
        let mut app = test_app();
        app.search_bias = SearchBias::NearUser { radius_m: 10_000.0 };
        assert!(app.bias_region().is_none());

        app.location.current = Some(Coordinate::new(37.0, -122.0));
        let region = app.bias_region().unwrap();
        assert_eq!(region.center, Coordinate::new(37.0, -122.0));
    }

    #[test]
    fn test_global_bias_never_yields_region() {
        let mut app = test_app();
        app.location.current = Some(Coordinate::new(37.0, -122.0));
        assert!(app.bias_region().is_none());
    }

    #[test]
    fn test_authorization_states() {
        assert!(AuthorizationState::AuthorizedAlways.is_authorized());
        assert!(AuthorizationState::AuthorizedWhenInUse.is_authorized());
        assert!(!AuthorizationState::Denied.is_authorized());
        assert!(!AuthorizationState::Restricted.is_authorized());
        assert!(!AuthorizationState::NotDetermined.is_authorized());
    }
}
