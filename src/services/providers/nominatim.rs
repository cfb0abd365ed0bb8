//! OpenStreetMap Nominatim place search.
//!
//! Uses the `/search` endpoint with `format=jsonv2`:
//! - coordinates arrive as strings (`"lat": "37.33"`)
//! - `name` is empty for unnamed features
//! - `viewbox` biases results toward an area without excluding others

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::core::geo::{Coordinate, PlaceResult, Region};
use crate::services::{PlaceSearch, ServiceError};

// ============================================================================
// Nominatim API Types
// ============================================================================

/// A single entry of the `/search` response array.
#[derive(Deserialize, Debug)]
struct SearchHit {
    lat: String,
    lon: String,
    #[serde(default)]
    name: String,
}

// ============================================================================
// Translation Layer
// ============================================================================

/// Converts Nominatim hits into place results, keeping service order.
/// Hits with unparsable coordinates are skipped.
fn hits_to_places(hits: Vec<SearchHit>) -> Vec<PlaceResult> {
    hits.into_iter()
        .filter_map(|hit| {
            let latitude = hit.lat.parse::<f64>();
            let longitude = hit.lon.parse::<f64>();
            match (latitude, longitude) {
                (Ok(latitude), Ok(longitude)) => {
                    let name = Some(hit.name).filter(|n| !n.trim().is_empty());
                    Some(PlaceResult::new(name, Coordinate::new(latitude, longitude)))
                }
                _ => {
                    warn!("Skipping hit with bad coordinates: {}, {}", hit.lat, hit.lon);
                    None
                }
            }
        })
        .collect()
}

/// Formats a region as Nominatim's `viewbox=<west>,<north>,<east>,<south>`.
fn viewbox(region: &Region) -> String {
    format!(
        "{},{},{},{}",
        region.west(),
        region.north(),
        region.east(),
        region.south()
    )
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct NominatimPlaceSearch {
    base_url: String,
    user_agent: String,
    limit: u32,
    client: reqwest::Client,
}

impl NominatimPlaceSearch {
    pub fn new(base_url: String, user_agent: String, limit: u32) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent,
            limit,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PlaceSearch for NominatimPlaceSearch {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn search(
        &self,
        query: &str,
        region: Option<Region>,
    ) -> Result<Vec<PlaceResult>, ServiceError> {
        let mut params = vec![
            ("q", query.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(region) = &region {
            params.push(("viewbox", viewbox(region)));
        }

        info!(
            "Nominatim search: query={:?}, limit={}, biased={}",
            query,
            self.limit,
            region.is_some()
        );

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&params)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        debug!("Nominatim response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Nominatim API error: {} - {}", status, err_body);
            return Err(ServiceError::Api {
                status,
                message: err_body,
            });
        }

        let hits: Vec<SearchHit> = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;
        let places = hits_to_places(hits);
        info!("Nominatim returned {} places for {:?}", places.len(), query);
        Ok(places)
    }
}
