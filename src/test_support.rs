//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::geo::{Coordinate, PlaceResult};
use crate::core::state::App;

/// Creates an App with default settings (global search, automobile routes).
pub fn test_app() -> App {
    App::new()
}

/// A named place at the given coordinate.
pub fn place(name: &str, latitude: f64, longitude: f64) -> PlaceResult {
    PlaceResult::new(Some(name.to_string()), Coordinate::new(latitude, longitude))
}

/// A place search that answers every query with the same places and
/// records what it was asked.
pub struct StaticPlaces {
    pub results: Vec<PlaceResult>,
    pub queries: std::sync::Mutex<Vec<String>>,
}

impl StaticPlaces {
    pub fn new(results: Vec<PlaceResult>) -> Self {
        Self {
            results,
            queries: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl crate::services::PlaceSearch for StaticPlaces {
    fn name(&self) -> &str {
        "static"
    }

    async fn search(
        &self,
        query: &str,
        _region: Option<crate::core::geo::Region>,
    ) -> Result<Vec<PlaceResult>, crate::services::ServiceError> {
        self.queries.lock().unwrap().push(query.to_string());
        if query == "fail" {
            return Err(crate::services::ServiceError::Network("offline".to_string()));
        }
        Ok(self.results.clone())
    }
}
