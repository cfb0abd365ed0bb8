//! OSRM directions using the `/route/v1/{profile}` HTTP API.
//!
//! OSRM orders coordinates as `lon,lat` (both in the URL path and in the
//! GeoJSON geometry); everything is flipped back to `Coordinate` here.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::core::geo::{Coordinate, RouteGeometry, TravelMode};
use crate::services::{Directions, ServiceError};

// ============================================================================
// OSRM API Types
// ============================================================================

#[derive(Deserialize, Debug)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Deserialize, Debug)]
struct ApiRoute {
    geometry: LineString,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

/// GeoJSON LineString: `[[lon, lat], ...]`.
#[derive(Deserialize, Debug)]
struct LineString {
    coordinates: Vec<[f64; 2]>,
}

// ============================================================================
// Translation Layer
// ============================================================================

/// Maps a travel mode to the OSRM profile segment of the URL.
fn mode_to_profile(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Automobile => "driving",
        TravelMode::Walking => "foot",
        TravelMode::Cycling => "bike",
    }
}

fn route_path(profile: &str, from: Coordinate, to: Coordinate) -> String {
    format!(
        "/route/v1/{}/{},{};{},{}",
        profile, from.longitude, from.latitude, to.longitude, to.latitude
    )
}

/// Takes the first route of a response, or explains why there is none.
fn first_route(response: RouteResponse) -> Result<RouteGeometry, ServiceError> {
    if response.code != "Ok" {
        let detail = response.message.unwrap_or_else(|| response.code.clone());
        return Err(ServiceError::NotFound(detail));
    }
    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::NotFound("no routes returned".to_string()))?;

    Ok(RouteGeometry {
        polyline: route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coordinate::new(lat, lon))
            .collect(),
        distance_m: route.distance,
        duration_s: route.duration,
    })
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct OsrmDirections {
    base_url: String,
    client: reqwest::Client,
}

impl OsrmDirections {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Directions for OsrmDirections {
    fn name(&self) -> &str {
        "osrm"
    }

    async fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<RouteGeometry, ServiceError> {
        let path = route_path(mode_to_profile(mode), from, to);
        info!(
            "OSRM route request: {:?} -> {:?} ({})",
            from,
            to,
            mode.label()
        );

        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("alternatives", "false"),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = response.status();
        debug!("OSRM response status: {}", status);

        // OSRM reports "no route" as a 400 with a JSON body, so parse before judging.
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        let parsed: RouteResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => return Err(ServiceError::Parse(e.to_string())),
            Err(_) => {
                warn!("OSRM API error: {} - {}", status.as_u16(), body);
                return Err(ServiceError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }
        };

        let route = first_route(parsed)?;
        info!(
            "OSRM route: {} points, {:.0} m, {:.0} s",
            route.polyline.len(),
            route.distance_m,
            route.duration_s
        );
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_to_profile() {
        assert_eq!(mode_to_profile(TravelMode::Automobile), "driving");
        assert_eq!(mode_to_profile(TravelMode::Walking), "foot");
        assert_eq!(mode_to_profile(TravelMode::Cycling), "bike");
    }

    #[test]
    fn test_route_path_uses_lon_lat_order() {
        let path = route_path(
            "driving",
            Coordinate::new(37.1, -122.1),
            Coordinate::new(37.0, -122.0),
        );
        assert_eq!(path, "/route/v1/driving/-122.1,37.1;-122,37");
    }

    #[test]
    fn test_first_route_flips_coordinates() {
        let json = r#"{
            "code": "Ok",
            "routes": [
                {"geometry": {"type": "LineString", "coordinates": [[-122.1, 37.1], [-122.0, 37.0]]},
                 "distance": 1500.5, "duration": 120.0},
                {"geometry": {"type": "LineString", "coordinates": [[0.0, 0.0]]}}
            ]
        }"#;
        let response: RouteResponse = serde_json::from_str(json).unwrap();
        let route = first_route(response).unwrap();
        assert_eq!(
            route.polyline,
            vec![Coordinate::new(37.1, -122.1), Coordinate::new(37.0, -122.0)]
        );
        assert_eq!(route.distance_m, 1500.5);
    }

    #[test]
    fn test_no_route_code_is_not_found() {
        let json = r#"{"code": "NoRoute", "message": "Impossible route between points", "routes": []}"#;
        let response: RouteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            first_route(response),
            Err(ServiceError::NotFound(
                "Impossible route between points".to_string()
            ))
        );
    }

    #[test]
    fn test_ok_without_routes_is_not_found() {
        let json = r#"{"code": "Ok"}"#;
        let response: RouteResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(first_route(response), Err(ServiceError::NotFound(_))));
    }
}
