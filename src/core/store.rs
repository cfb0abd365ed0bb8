//! # Store
//!
//! Owns the `App` and is the only way to change it from the outside.
//! `dispatch()` runs the reducer, then tells every subscriber which parts of
//! the state moved. Renderers subscribe instead of polling fields.
//!
//! ```text
//! Action ──▶ Store::dispatch ──▶ update() ──▶ diff revisions ──▶ listeners(Topic)
//!                                    │
//!                                    └──▶ Effect (returned to the caller)
//! ```
//!
//! Listeners run synchronously on the thread that dispatched, which is always
//! the UI thread.

use crate::core::action::{Action, Effect, update};
use crate::core::slot::SearchSlot;
use crate::core::state::{App, Revisions};

/// A slice of state that changed during one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Location,
    Authorization,
    Query(SearchSlot),
    Results(SearchSlot),
    Route,
    Camera,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&App, Topic)>;

pub struct Store {
    app: App,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl Store {
    pub fn new(app: App) -> Self {
        Self {
            app,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&App, Topic) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn dispatch(&mut self, action: Action) -> Effect {
        let before = self.app.revisions;
        let effect = update(&mut self.app, action);
        let topics = changed_topics(&before, &self.app.revisions);
        for topic in topics {
            for (_, listener) in self.listeners.iter_mut() {
                listener(&self.app, topic);
            }
        }
        effect
    }
}

fn changed_topics(before: &Revisions, after: &Revisions) -> Vec<Topic> {
    let mut topics = Vec::new();
    if before.authorization != after.authorization {
        topics.push(Topic::Authorization);
    }
    if before.location != after.location {
        topics.push(Topic::Location);
    }
    if before.camera != after.camera {
        topics.push(Topic::Camera);
    }
    for slot in SearchSlot::ALL {
        if before.queries[slot.index()] != after.queries[slot.index()] {
            topics.push(Topic::Query(slot));
        }
        if before.results[slot.index()] != after.results[slot.index()] {
            topics.push(Topic::Results(slot));
        }
    }
    if before.route != after.route {
        topics.push(Topic::Route);
    }
    topics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Coordinate;
    use crate::test_support::{place, test_app};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_store() -> (Store, Rc<RefCell<Vec<Topic>>>) {
        let mut store = Store::new(test_app());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |_, topic| sink.borrow_mut().push(topic));
        (store, seen)
    }

    #[test]
    fn test_first_fix_notifies_location_and_camera() {
        let (mut store, seen) = recording_store();
        store.dispatch(Action::LocationUpdated(Coordinate::new(1.0, 2.0)));
        assert_eq!(*seen.borrow(), vec![Topic::Location, Topic::Camera]);

        seen.borrow_mut().clear();
        store.dispatch(Action::LocationUpdated(Coordinate::new(1.5, 2.0)));
        assert_eq!(*seen.borrow(), vec![Topic::Location]);
    }

    #[test]
    fn test_results_notify_only_their_slot() {
        let (mut store, seen) = recording_store();
        store.dispatch(Action::QueryChanged {
            slot: SearchSlot::B,
            text: "pizza".to_string(),
        });
        store.dispatch(Action::DebounceElapsed {
            slot: SearchSlot::B,
            generation: 1,
        });
        store.dispatch(Action::SearchCompleted {
            slot: SearchSlot::B,
            seq: 1,
            results: vec![place("Tony's", 1.0, 1.0)],
        });
        assert_eq!(
            *seen.borrow(),
            vec![Topic::Query(SearchSlot::B), Topic::Results(SearchSlot::B)]
        );
    }

    #[test]
    fn test_stale_completion_notifies_nobody() {
        let (mut store, seen) = recording_store();
        store.dispatch(Action::SearchCompleted {
            slot: SearchSlot::A,
            seq: 7,
            results: vec![place("Ghost", 1.0, 1.0)],
        });
        assert!(seen.borrow().is_empty());
        assert!(store.app().slot(SearchSlot::A).results.is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = Store::new(test_app());
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = store.subscribe(move |_, _| *sink.borrow_mut() += 1);

        store.dispatch(Action::LocationUpdated(Coordinate::new(1.0, 2.0)));
        assert_eq!(*count.borrow(), 2);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(Action::LocationUpdated(Coordinate::new(3.0, 4.0)));
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_listener_sees_updated_state() {
        let mut store = Store::new(test_app());
        let observed = Rc::new(RefCell::new(None));
        let sink = observed.clone();
        store.subscribe(move |app, topic| {
            if topic == Topic::Location {
                *sink.borrow_mut() = app.location.current;
            }
        });
        store.dispatch(Action::LocationUpdated(Coordinate::new(5.0, 6.0)));
        assert_eq!(*observed.borrow(), Some(Coordinate::new(5.0, 6.0)));
    }

    #[test]
    fn test_dispatch_returns_reducer_effect() {
        let mut store = Store::new(test_app());
        assert_eq!(store.dispatch(Action::Quit), Effect::Quit);
    }
}
