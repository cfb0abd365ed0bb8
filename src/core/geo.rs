//! # Geographic Value Types
//!
//! Plain data shared by every layer: coordinates, map regions, place results
//! and route geometry. Nothing here talks to a service.

use serde::{Deserialize, Serialize};

use crate::core::slot::SearchSlot;

/// Meters covered by one degree of latitude (close enough everywhere on Earth).
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Identity key used for map results: `"{lat}-{lon}"`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.latitude, self.longitude)
    }

    /// Parses `"lat,lon"` (whitespace around either number is allowed).
    pub fn parse(text: &str) -> Option<Self> {
        let (lat, lon) = text.split_once(',')?;
        let latitude: f64 = lat.trim().parse().ok()?;
        let longitude: f64 = lon.trim().parse().ok()?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(Self::new(latitude, longitude))
    }
}

/// A rectangular window onto the map, expressed as a center and degree spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub center: Coordinate,
    pub lat_span_deg: f64,
    pub lon_span_deg: f64,
}

impl Region {
    /// Builds a region of `meters_lat` x `meters_lon` around `center`.
    pub fn around(center: Coordinate, meters_lat: f64, meters_lon: f64) -> Self {
        let lat_span_deg = meters_lat / METERS_PER_DEGREE_LAT;
        // Longitude degrees shrink toward the poles; clamp so the span stays finite.
        let cos_lat = center.latitude.to_radians().cos().max(0.01);
        let lon_span_deg = meters_lon / (METERS_PER_DEGREE_LAT * cos_lat);
        Self {
            center,
            lat_span_deg,
            lon_span_deg,
        }
    }

    pub fn north(&self) -> f64 {
        self.center.latitude + self.lat_span_deg / 2.0
    }

    pub fn south(&self) -> f64 {
        self.center.latitude - self.lat_span_deg / 2.0
    }

    pub fn east(&self) -> f64 {
        self.center.longitude + self.lon_span_deg / 2.0
    }

    pub fn west(&self) -> f64 {
        self.center.longitude - self.lon_span_deg / 2.0
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        (self.south()..=self.north()).contains(&coord.latitude)
            && (self.west()..=self.east()).contains(&coord.longitude)
    }

    /// Moves the window by a fraction of its own size (positive = north/east).
    pub fn panned(&self, north_frac: f64, east_frac: f64) -> Self {
        let latitude = (self.center.latitude + north_frac * self.lat_span_deg).clamp(-90.0, 90.0);
        let longitude = self.center.longitude + east_frac * self.lon_span_deg;
        Self {
            center: Coordinate::new(latitude, longitude),
            ..*self
        }
    }

    /// Scales the spans; `factor < 1.0` zooms in.
    pub fn zoomed(&self, factor: f64) -> Self {
        Self {
            center: self.center,
            lat_span_deg: (self.lat_span_deg * factor).clamp(1e-5, 180.0),
            lon_span_deg: (self.lon_span_deg * factor).clamp(1e-5, 360.0),
        }
    }
}

/// A place returned by a search, keyed by its coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceResult {
    pub id: String,
    pub name: Option<String>,
    pub coordinate: Coordinate,
}

impl PlaceResult {
    pub fn new(name: Option<String>, coordinate: Coordinate) -> Self {
        Self {
            id: coordinate.key(),
            name,
            coordinate,
        }
    }

    /// The name to show on the map, falling back to `"Unknown (A)"`.
    pub fn display_name(&self, slot: SearchSlot) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Unknown {}", slot.suffix()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Automobile,
    Walking,
    Cycling,
}

impl TravelMode {
    pub fn label(&self) -> &'static str {
        match self {
            TravelMode::Automobile => "automobile",
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
        }
    }
}

/// The single route shown on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    pub polyline: Vec<Coordinate>,
    pub distance_m: f64,
    pub duration_s: f64,
}

impl RouteGeometry {
    /// Consecutive point pairs, ready to be drawn as line segments.
    pub fn segments(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        self.polyline.windows(2).map(|pair| (pair[0], pair[1]))
    }
}
