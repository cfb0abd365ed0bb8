use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::core::geo::{Coordinate, PlaceResult, Region, RouteGeometry, TravelMode};
use crate::core::state::AuthorizationState;

/// Errors that can occur while talking to an external service.
/// None of these are retried; callers degrade to "nothing shown".
#[derive(Debug, PartialEq)]
pub enum ServiceError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Service returned an error response.
    Api { status: u16, message: String },
    /// Failed to parse the service's response.
    Parse(String),
    /// The service answered but had nothing for this request.
    NotFound(String),
    /// The mpsc channel was closed (the consumer went away).
    ChannelClosed,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Network(msg) => write!(f, "network error: {msg}"),
            ServiceError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ServiceError::Parse(msg) => write!(f, "parse error: {msg}"),
            ServiceError::NotFound(msg) => write!(f, "not found: {msg}"),
            ServiceError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Natural-language place lookup.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    fn name(&self) -> &str;

    /// Resolves `query` to places in service order. `region` biases the
    /// search toward an area; `None` searches globally.
    async fn search(
        &self,
        query: &str,
        region: Option<Region>,
    ) -> Result<Vec<PlaceResult>, ServiceError>;
}

/// Point-to-point routing.
#[async_trait]
pub trait Directions: Send + Sync {
    fn name(&self) -> &str;

    /// Computes a single route; only the first route the service offers is returned.
    async fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<RouteGeometry, ServiceError>;
}

/// Where the user is.
#[async_trait]
pub trait LocationSource: Send + Sync {
    fn name(&self) -> &str;

    /// Asks for permission to read the location and reports the outcome.
    ///
    /// Called once at start-up. A grant or revocation made afterwards is not
    /// observed until the next launch.
    async fn request_authorization(&self) -> AuthorizationState;

    /// Streams fixes to `sender` until the source is exhausted or the receiver
    /// goes away. Individual delivery failures are sent as `Err` and the
    /// stream keeps going.
    async fn stream_fixes(
        &self,
        sender: Sender<Result<Coordinate, ServiceError>>,
    ) -> Result<(), ServiceError>;
}
