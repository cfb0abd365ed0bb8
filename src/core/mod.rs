//! # Core Application Logic
//!
//! This module contains the app's state and the rules that change it.
//! It knows nothing about any specific UI technology or network service.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Store (observers)    │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │   Engine   │      │  Services  │
//!     │  Adapter   │      │  (tokio    │      │  (HTTP,    │
//!     │ (ratatui)  │      │   tasks)   │      │  location) │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`store`]: Observable container that notifies on change
//! - [`dispatch`]: Hand-off from background tasks to the UI thread
//! - [`scene`]: What the map shows, derived from state

pub mod action;
pub mod config;
pub mod dispatch;
pub mod geo;
pub mod scene;
pub mod slot;
pub mod state;
pub mod store;
