//! # Dispatcher
//!
//! The one hand-off point between background tasks and the UI thread.
//! Tokio tasks never touch `App`; they send an `Action` here and the UI loop
//! drains the receiver and feeds each action through `Store::dispatch`.

use std::sync::mpsc;

use log::warn;

use crate::core::action::Action;

#[derive(Clone)]
pub struct Dispatcher {
    sender: mpsc::Sender<Action>,
}

impl Dispatcher {
    pub fn new(sender: mpsc::Sender<Action>) -> Self {
        Self { sender }
    }

    /// Creates a dispatcher together with the receiver the UI loop drains.
    pub fn channel() -> (Self, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }

    /// Returns false if the UI loop has already gone away.
    pub fn send(&self, action: Action) -> bool {
        match self.sender.send(action) {
            Ok(()) => true,
            Err(mpsc::SendError(action)) => {
                warn!("Dropping {:?}: UI receiver dropped", action);
                false
            }
        }
    }
}
