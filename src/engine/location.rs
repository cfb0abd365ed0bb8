//! Wraps a `LocationSource`: asks for permission once, then forwards every
//! fix to the UI thread. Failed deliveries are logged and otherwise ignored.

use std::sync::Arc;

use log::{info, warn};
use tokio::task::AbortHandle;

use crate::core::action::Action;
use crate::core::dispatch::Dispatcher;
use crate::core::geo::Coordinate;
use crate::services::{LocationSource, ServiceError};

pub struct LocationProvider {
    source: Arc<dyn LocationSource>,
    dispatcher: Dispatcher,
    handles: Vec<AbortHandle>,
}

impl LocationProvider {
    pub fn new(source: Arc<dyn LocationSource>, dispatcher: Dispatcher) -> Self {
        Self {
            source,
            dispatcher,
            handles: Vec::new(),
        }
    }

    /// Requests authorization; the answer arrives as `AuthorizationChanged`.
    pub fn start(&mut self) {
        info!("Requesting location authorization from {}", self.source.name());
        let source = self.source.clone();
        let dispatcher = self.dispatcher.clone();
        let handle = tokio::spawn(async move {
            let authorization = source.request_authorization().await;
            info!("Location authorization: {:?}", authorization);
            dispatcher.send(Action::AuthorizationChanged(authorization));
        });
        self.handles.push(handle.abort_handle());
    }

    /// Starts the fix stream. Runs until the source ends or `stop()` is called.
    pub fn start_updates(&mut self) {
        info!("Starting location updates from {}", self.source.name());
        let (fix_tx, mut fix_rx) =
            tokio::sync::mpsc::channel::<Result<Coordinate, ServiceError>>(16);

        let source = self.source.clone();
        let stream_handle = tokio::spawn(async move {
            if let Err(e) = source.stream_fixes(fix_tx).await {
                info!("Location stream ended: {}", e);
            }
        });

        let dispatcher = self.dispatcher.clone();
        let forward_handle = tokio::spawn(async move {
            while let Some(fix) = fix_rx.recv().await {
                let action = match fix {
                    Ok(coordinate) => Action::LocationUpdated(coordinate),
                    Err(e) => {
                        warn!("Location delivery failed: {}", e);
                        Action::LocationFailed(e.to_string())
                    }
                };
                if !dispatcher.send(action) {
                    return;
                }
            }
        });

        self.handles.push(stream_handle.abort_handle());
        self.handles.push(forward_handle.abort_handle());
    }

    pub fn stop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}
