//! In-memory services and a driver that runs the UI loop's job in tests:
//! drain the dispatcher, feed the store, hand effects to the engine.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;
use whereto::core::action::{Action, Effect};
use whereto::core::dispatch::Dispatcher;
use whereto::core::geo::{Coordinate, PlaceResult, Region, RouteGeometry, TravelMode};
use whereto::core::state::{App, AuthorizationState};
use whereto::core::store::{Store, Topic};
use whereto::engine::{Engine, Services};
use whereto::services::{Directions, LocationSource, PlaceSearch, ServiceError};

pub const DEBOUNCE: Duration = Duration::from_millis(300);

pub fn place(name: &str, latitude: f64, longitude: f64) -> PlaceResult {
    PlaceResult::new(Some(name.to_string()), Coordinate::new(latitude, longitude))
}

// ============================================================================
// Mock Services
// ============================================================================

/// Answers from a fixed table; unknown queries return nothing.
#[derive(Default)]
pub struct MockPlaces {
    answers: HashMap<String, (Duration, Vec<PlaceResult>)>,
    pub calls: Mutex<Vec<(String, Option<Region>)>>,
}

impl MockPlaces {
    pub fn answer(mut self, query: &str, results: Vec<PlaceResult>) -> Self {
        self.answers
            .insert(query.to_string(), (Duration::from_millis(10), results));
        self
    }

    /// Like `answer`, but the reply takes `delay` to arrive.
    pub fn answer_after(mut self, query: &str, delay: Duration, results: Vec<PlaceResult>) -> Self {
        self.answers.insert(query.to_string(), (delay, results));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(q, _)| q.clone())
            .collect()
    }
}

#[async_trait]
impl PlaceSearch for MockPlaces {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(
        &self,
        query: &str,
        region: Option<Region>,
    ) -> Result<Vec<PlaceResult>, ServiceError> {
        self.calls.lock().unwrap().push((query.to_string(), region));
        match self.answers.get(query) {
            Some((delay, results)) => {
                tokio::time::sleep(*delay).await;
                Ok(results.clone())
            }
            None => Err(ServiceError::NotFound(query.to_string())),
        }
    }
}

/// Draws a straight line to any destination except `unreachable`.
#[derive(Default)]
pub struct MockDirections {
    pub unreachable: Option<Coordinate>,
    pub calls: Mutex<Vec<(Coordinate, Coordinate, TravelMode)>>,
}

#[async_trait]
impl Directions for MockDirections {
    fn name(&self) -> &str {
        "mock"
    }

    async fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<RouteGeometry, ServiceError> {
        self.calls.lock().unwrap().push((from, to, mode));
        tokio::time::sleep(Duration::from_millis(20)).await;
        if self.unreachable == Some(to) {
            return Err(ServiceError::NotFound("no route".to_string()));
        }
        Ok(RouteGeometry {
            polyline: vec![from, to],
            distance_m: 1000.0,
            duration_s: 60.0,
        })
    }
}

pub struct MockLocation {
    pub authorization: AuthorizationState,
    pub fix: Coordinate,
}

#[async_trait]
impl LocationSource for MockLocation {
    fn name(&self) -> &str {
        "mock"
    }

    async fn request_authorization(&self) -> AuthorizationState {
        self.authorization
    }

    async fn stream_fixes(
        &self,
        sender: Sender<Result<Coordinate, ServiceError>>,
    ) -> Result<(), ServiceError> {
        sender
            .send(Err(ServiceError::Network("warming up".to_string())))
            .await
            .map_err(|_| ServiceError::ChannelClosed)?;
        sender
            .send(Ok(self.fix))
            .await
            .map_err(|_| ServiceError::ChannelClosed)
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Plays the part of the UI loop.
pub struct Harness {
    pub store: Store,
    pub engine: Engine,
    pub places: Arc<MockPlaces>,
    pub directions: Arc<MockDirections>,
    pub topics: Rc<RefCell<Vec<Topic>>>,
    rx: Receiver<Action>,
}

impl Harness {
    pub fn new(app: App, places: MockPlaces, directions: MockDirections, location: MockLocation) -> Self {
        let places = Arc::new(places);
        let directions = Arc::new(directions);
        let services = Services {
            places: places.clone(),
            directions: directions.clone(),
            location: Arc::new(location),
        };
        let (dispatcher, rx) = Dispatcher::channel();
        let engine = Engine::new(services, dispatcher, DEBOUNCE);

        let mut store = Store::new(app);
        let topics = Rc::new(RefCell::new(Vec::new()));
        let sink = topics.clone();
        store.subscribe(move |_, topic| sink.borrow_mut().push(topic));

        Self {
            store,
            engine,
            places,
            directions,
            topics,
            rx,
        }
    }

    pub fn app(&self) -> &App {
        self.store.app()
    }

    pub fn dispatch(&mut self, action: Action) {
        let effect = self.store.dispatch(action);
        if effect != Effect::None {
            self.engine.run(effect);
        }
    }

    /// Lets background tasks run for `duration` of (paused) time, applying
    /// every action they send along the way.
    pub async fn pump(&mut self, duration: Duration) {
        let step = Duration::from_millis(10);
        let mut elapsed = Duration::ZERO;
        while elapsed < duration {
            tokio::time::sleep(step).await;
            elapsed += step;
            while let Ok(action) = self.rx.try_recv() {
                self.dispatch(action);
            }
        }
    }

    /// Starts location and waits for the first fix to land.
    pub async fn locate(&mut self) {
        self.engine.location.start();
        self.pump(Duration::from_millis(50)).await;
    }
}

pub fn fixed_location(latitude: f64, longitude: f64) -> MockLocation {
    MockLocation {
        authorization: AuthorizationState::AuthorizedAlways,
        fix: Coordinate::new(latitude, longitude),
    }
}
