//! A location source that always reports the same coordinate.
//!
//! Used when the location comes from config or CLI flags. There is nothing to
//! consent to, so authorization is granted immediately.

use async_trait::async_trait;
use log::info;
use tokio::sync::mpsc::Sender;

use crate::core::geo::Coordinate;
use crate::core::state::AuthorizationState;
use crate::services::{LocationSource, ServiceError};

pub struct FixedLocationSource {
    coordinate: Coordinate,
}

impl FixedLocationSource {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

#[async_trait]
impl LocationSource for FixedLocationSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn request_authorization(&self) -> AuthorizationState {
        AuthorizationState::AuthorizedAlways
    }

    async fn stream_fixes(
        &self,
        sender: Sender<Result<Coordinate, ServiceError>>,
    ) -> Result<(), ServiceError> {
        info!("Fixed location: {:?}", self.coordinate);
        sender
            .send(Ok(self.coordinate))
            .await
            .map_err(|_| ServiceError::ChannelClosed)
    }
}
