//! Approximate location from the public IP address (ip-api.com JSON API).
//!
//! The fix is re-polled on a fixed interval so the location behaves like a
//! continuous stream. A failed poll is reported down the channel and the
//! stream carries on with the next poll.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use tokio::sync::mpsc::Sender;

use crate::core::geo::Coordinate;
use crate::core::state::AuthorizationState;
use crate::services::{LocationSource, ServiceError};

#[derive(Deserialize, Debug)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

fn response_to_fix(response: IpApiResponse) -> Result<Coordinate, ServiceError> {
    if response.status != "success" {
        let message = response.message.unwrap_or(response.status);
        return Err(ServiceError::NotFound(message));
    }
    match (response.lat, response.lon) {
        (Some(lat), Some(lon)) => Ok(Coordinate::new(lat, lon)),
        _ => Err(ServiceError::Parse("response without lat/lon".to_string())),
    }
}

pub struct IpLocationSource {
    base_url: String,
    poll_interval: Duration,
    consent: bool,
    client: reqwest::Client,
}

impl IpLocationSource {
    pub fn new(base_url: String, poll_interval: Duration, consent: bool) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_interval,
            consent,
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_fix(&self) -> Result<Coordinate, ServiceError> {
        let response = self
            .client
            .get(format!("{}/json", self.base_url))
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        debug!("ip-api response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ServiceError::Api {
                status,
                message: err_body,
            });
        }

        let parsed: IpApiResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;
        response_to_fix(parsed)
    }
}

#[async_trait]
impl LocationSource for IpLocationSource {
    fn name(&self) -> &str {
        "ip-api"
    }

    async fn request_authorization(&self) -> AuthorizationState {
        if self.consent {
            AuthorizationState::AuthorizedWhenInUse
        } else {
            AuthorizationState::Denied
        }
    }

    async fn stream_fixes(
        &self,
        sender: Sender<Result<Coordinate, ServiceError>>,
    ) -> Result<(), ServiceError> {
        info!(
            "Polling {} every {}s for location",
            self.base_url,
            self.poll_interval.as_secs()
        );
        loop {
            let fix = self.fetch_fix().await;
            if let Err(e) = &fix {
                warn!("IP location lookup failed: {}", e);
            }
            sender
                .send(fix)
                .await
                .map_err(|_| ServiceError::ChannelClosed)?;
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
