use std::sync::Arc;

use log::{info, warn};

use crate::core::action::Action;
use crate::core::dispatch::Dispatcher;
use crate::core::geo::{Coordinate, TravelMode};
use crate::services::Directions;

/// Runs directions requests. The reducer decides which completion wins.
pub struct RouteCalculator {
    directions: Arc<dyn Directions>,
    dispatcher: Dispatcher,
}

impl RouteCalculator {
    pub fn new(directions: Arc<dyn Directions>, dispatcher: Dispatcher) -> Self {
        Self {
            directions,
            dispatcher,
        }
    }

    pub fn calculate_route(&self, seq: u64, from: Coordinate, to: Coordinate, mode: TravelMode) {
        info!(
            "Spawning route request (seq={}, provider={})",
            seq,
            self.directions.name()
        );
        let directions = self.directions.clone();
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            let result = directions.route(from, to, mode).await.map_err(|e| {
                warn!("Route error (seq={}): {}", seq, e);
                e.to_string()
            });
            dispatcher.send(Action::RouteCompleted { seq, result });
        });
    }
}
