//! # Map Scene
//!
//! A declarative description of everything the map shows, derived from `App`
//! on every render. The TUI draws a `MapScene`; it never reads `App` fields
//! for map content directly.

use crate::core::geo::{Coordinate, Region, RouteGeometry};
use crate::core::slot::SearchSlot;
use crate::core::state::App;

/// One tappable result marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub slot: SearchSlot,
    /// Position within the slot's result list.
    pub index: usize,
    pub id: String,
    pub label: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapScene<'a> {
    pub user: Coordinate,
    pub markers: Vec<MarkerSpec>,
    pub route: Option<&'a RouteGeometry>,
    pub region: Region,
}

impl<'a> MapScene<'a> {
    /// Nothing is shown until the first location fix arrives.
    pub fn from_app(app: &'a App) -> Option<Self> {
        let user = app.location.current?;
        let region = app
            .camera
            .unwrap_or_else(|| Region::around(user, app.initial_region_m, app.initial_region_m));

        let markers = SearchSlot::ALL
            .iter()
            .flat_map(|&slot| {
                app.slot(slot)
                    .results
                    .iter()
                    .enumerate()
                    .map(move |(index, place)| MarkerSpec {
                        slot,
                        index,
                        id: place.id.clone(),
                        label: place.display_name(slot),
                        coordinate: place.coordinate,
                    })
            })
            .collect();

        Some(Self {
            user,
            markers,
            route: app.route.geometry.as_ref(),
            region,
        })
    }

    pub fn markers_for(&self, slot: SearchSlot) -> impl Iterator<Item = &MarkerSpec> {
        self.markers.iter().filter(move |m| m.slot == slot)
    }
}
