//! # Actions
//!
//! Everything that can happen in the app becomes an `Action`.
//! User edits slot A? That's `Action::QueryChanged`.
//! A search returns? That's `Action::SearchCompleted`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns the `Effect` the runtime should carry out. No side
//! effects here. Timers, HTTP and location streams live in `engine`.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Async completions carry the sequence number they were issued with. A
//! completion whose number is no longer the latest is dropped, so whatever the
//! user asked for last is what ends up on the map.

use log::debug;

use crate::core::geo::{Coordinate, PlaceResult, Region, RouteGeometry, TravelMode};
use crate::core::slot::SearchSlot;
use crate::core::state::{App, AuthorizationState, SlotPhase};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Text in a search box changed.
    QueryChanged { slot: SearchSlot, text: String },
    /// The quiet period started by `QueryChanged` with this generation elapsed.
    DebounceElapsed { slot: SearchSlot, generation: u64 },
    /// A search issued with `seq` finished. Failures arrive as an empty list.
    SearchCompleted {
        slot: SearchSlot,
        seq: u64,
        results: Vec<PlaceResult>,
    },
    AuthorizationChanged(AuthorizationState),
    LocationUpdated(Coordinate),
    LocationFailed(String),
    /// The user picked the `index`th result of `slot` on the map.
    MarkerTapped { slot: SearchSlot, index: usize },
    RouteCompleted {
        seq: u64,
        result: Result<RouteGeometry, String>,
    },
    /// Move the camera by a fraction of the visible window.
    PanCamera { north: f64, east: f64 },
    ZoomCamera(f64),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Start (or restart) the quiet-period timer for a slot.
    StartDebounce { slot: SearchSlot, generation: u64 },
    SpawnSearch {
        slot: SearchSlot,
        seq: u64,
        query: String,
        region: Option<Region>,
    },
    StartLocationUpdates,
    SpawnRoute {
        seq: u64,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::QueryChanged { slot, text } => {
            let state = app.slot_mut(slot);
            state.query = text;
            state.debounce_generation += 1;
            state.phase = SlotPhase::Debouncing;
            let generation = state.debounce_generation;
            app.revisions.queries[slot.index()] += 1;
            Effect::StartDebounce { slot, generation }
        }
        Action::DebounceElapsed { slot, generation } => submit_query(app, slot, generation),
        Action::SearchCompleted {
            slot,
            seq,
            results,
        } => {
            let state = app.slot_mut(slot);
            if seq != state.search_seq {
                debug!(
                    "Discarding stale search for slot {} (seq={}, latest={})",
                    slot, seq, state.search_seq
                );
                return Effect::None;
            }
            state.results = results;
            state.in_flight = false;
            // An edit made while the search ran keeps the slot debouncing.
            if state.phase == SlotPhase::Searching {
                state.phase = SlotPhase::Idle;
            }
            app.revisions.results[slot.index()] += 1;
            Effect::None
        }
        Action::AuthorizationChanged(authorization) => {
            app.location.authorization = authorization;
            app.revisions.authorization += 1;
            if authorization.is_authorized() && !app.location.updates_requested {
                app.location.updates_requested = true;
                Effect::StartLocationUpdates
            } else {
                Effect::None
            }
        }
        Action::LocationUpdated(coordinate) => {
            app.location.current = Some(coordinate);
            app.revisions.location += 1;
            // Recentering happens once; after that the user owns the camera.
            if app.camera.is_none() {
                app.camera = Some(Region::around(
                    coordinate,
                    app.initial_region_m,
                    app.initial_region_m,
                ));
                app.revisions.camera += 1;
            }
            Effect::None
        }
        Action::LocationFailed(message) => {
            debug!("Location delivery failed: {}", message);
            Effect::None
        }
        Action::MarkerTapped { slot, index } => {
            let Some(from) = app.location.current else {
                debug!("Marker tapped without a location fix; ignoring");
                return Effect::None;
            };
            let Some(place) = app.slot(slot).results.get(index) else {
                debug!("Marker {} of slot {} no longer exists", index, slot);
                return Effect::None;
            };
            let to = place.coordinate;
            app.route.seq += 1;
            app.route.pending = true;
            app.route.destination = Some(to);
            app.revisions.route += 1;
            Effect::SpawnRoute {
                seq: app.route.seq,
                from,
                to,
                mode: app.travel_mode,
            }
        }
        Action::RouteCompleted { seq, result } => {
            if seq != app.route.seq {
                debug!(
                    "Discarding stale route (seq={}, latest={})",
                    seq, app.route.seq
                );
                return Effect::None;
            }
            app.route.pending = false;
            match result {
                Ok(geometry) => app.route.geometry = Some(geometry),
                // The previous route stays on screen.
                Err(message) => debug!("Keeping previous route after failure: {}", message),
            }
            app.revisions.route += 1;
            Effect::None
        }
        Action::PanCamera { north, east } => {
            if let Some(region) = app.camera {
                app.camera = Some(region.panned(north, east));
                app.revisions.camera += 1;
            }
            Effect::None
        }
        Action::ZoomCamera(factor) => {
            if let Some(region) = app.camera
                && factor > 0.0
            {
                app.camera = Some(region.zoomed(factor));
                app.revisions.camera += 1;
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// Runs the tail of the debounce pipeline: stale-timer check, duplicate
/// removal, and the empty-query short circuit.
fn submit_query(app: &mut App, slot: SearchSlot, generation: u64) -> Effect {
    let region = app.bias_region();
    let state = app.slot_mut(slot);
    if generation != state.debounce_generation {
        return Effect::None;
    }

    if state.last_submitted.as_deref() == Some(state.query.as_str()) {
        // Nothing new to search for; a search already running keeps its phase.
        if state.phase == SlotPhase::Debouncing {
            state.phase = if state.in_flight {
                SlotPhase::Searching
            } else {
                SlotPhase::Idle
            };
        }
        return Effect::None;
    }

    let query = state.query.clone();
    state.last_submitted = Some(query.clone());
    // Empty submissions still advance the sequence so older searches can't land.
    state.search_seq += 1;
    state.in_flight = false;

    if query.is_empty() {
        state.results.clear();
        state.phase = SlotPhase::Idle;
        app.revisions.results[slot.index()] += 1;
        return Effect::None;
    }

    state.phase = SlotPhase::Searching;
    state.in_flight = true;
    Effect::SpawnSearch {
        slot,
        seq: state.search_seq,
        query,
        region,
    }
}
