//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! ```text
//! terminal event ──▶ action_for_event ──▶ Store::dispatch ──▶ Engine::run
//!                                             ▲                   │
//!   Dispatcher receiver (drained every tick) ─┘◀── tokio tasks ◀──┘
//! ```
//!
//! All state changes happen on this thread. Background tasks only ever reach
//! the state through the `Dispatcher` channel, which is drained between
//! terminal events.
//!
//! ## Redraw Strategy
//!
//! A store subscriber raises a dirty flag whenever a topic changes. Input
//! events and resizes raise it too. Frames are only drawn when it is set.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info};
use std::cell::Cell;
use std::io::stdout;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::layout::{Position, Rect};

use crate::LocationSourceKind;
use crate::core::action::{Action, Effect};
use crate::core::config::ResolvedConfig;
use crate::core::dispatch::Dispatcher;
use crate::core::scene::MapScene;
use crate::core::slot::SearchSlot;
use crate::core::state::App;
use crate::core::store::Store;
use crate::engine::{Engine, Services};
use crate::services::{
    FixedLocationSource, IpLocationSource, LocationSource, NominatimPlaceSearch, OsrmDirections,
};
use crate::tui::component::EventHandler;
use crate::tui::components::map_view::hit_test;
use crate::tui::components::{MapEvent, MapViewState, SearchBox, SearchBoxEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Which area receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search(SearchSlot),
    Map,
}

impl Focus {
    /// Tab order: A, B, C, map, back to A.
    pub fn next(self) -> Self {
        match self {
            Focus::Search(SearchSlot::A) => Focus::Search(SearchSlot::B),
            Focus::Search(SearchSlot::B) => Focus::Search(SearchSlot::C),
            Focus::Search(SearchSlot::C) => Focus::Map,
            Focus::Map => Focus::Search(SearchSlot::A),
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Search(SearchSlot::A) => Focus::Map,
            Focus::Search(SearchSlot::B) => Focus::Search(SearchSlot::A),
            Focus::Search(SearchSlot::C) => Focus::Search(SearchSlot::B),
            Focus::Map => Focus::Search(SearchSlot::C),
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: Focus,
    pub search_boxes: [SearchBox; 3],
    pub map: MapViewState,
    /// Search box areas from the last frame, for mouse focus
    pub search_areas: [Rect; 3],
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            // User expects to type immediately
            focus: Focus::Search(SearchSlot::A),
            search_boxes: SearchSlot::ALL.map(SearchBox::new),
            map: MapViewState::new(),
            search_areas: [Rect::default(); 3],
        }
    }
}

/// Runs `cleanup` when dropped, including on an early `?` return.
struct OnDrop<F: FnOnce()> {
    cleanup: Option<F>,
}

impl<F: FnOnce()> OnDrop<F> {
    fn new(cleanup: F) -> Self {
        Self {
            cleanup: Some(cleanup),
        }
    }
}

impl<F: FnOnce()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Build the HTTP-backed services and location source a resolved config asks for.
pub fn build_services(config: &ResolvedConfig) -> Services {
    let location: Arc<dyn LocationSource> = match config.location_source {
        LocationSourceKind::Fixed => Arc::new(FixedLocationSource::new(config.fixed_location)),
        LocationSourceKind::Ip => Arc::new(IpLocationSource::new(
            config.ip_base_url.clone(),
            Duration::from_secs(config.poll_interval_secs),
            config.location_consent,
        )),
    };
    Services {
        places: Arc::new(NominatimPlaceSearch::new(
            config.nominatim_base_url.clone(),
            config.user_agent.clone(),
            config.search_limit,
        )),
        directions: Arc::new(OsrmDirections::new(config.osrm_base_url.clone())),
        location,
    }
}

/// Translates one terminal event into at most one action, updating
/// presentation state (focus, buffers, selection) along the way.
pub fn action_for_event(event: &TuiEvent, app: &App, tui: &mut TuiState) -> Option<Action> {
    match event {
        TuiEvent::Quit => Some(Action::Quit),
        TuiEvent::Resize => None,
        TuiEvent::FocusNext => {
            tui.focus = tui.focus.next();
            None
        }
        TuiEvent::FocusPrev => {
            tui.focus = tui.focus.prev();
            None
        }
        TuiEvent::MouseClick(column, row) => click_action(*column, *row, app, tui),
        _ => match tui.focus {
            Focus::Search(slot) => {
                // Enter hands the keyboard to the map to pick a result
                if matches!(event, TuiEvent::Submit) {
                    tui.focus = Focus::Map;
                    return None;
                }
                match tui.search_boxes[slot.index()].handle_event(event)? {
                    SearchBoxEvent::Changed(text) => Some(Action::QueryChanged { slot, text }),
                }
            }
            Focus::Map => match tui.map.handle_event(event)? {
                MapEvent::Pan { north, east } => Some(Action::PanCamera { north, east }),
                MapEvent::Zoom(factor) => Some(Action::ZoomCamera(factor)),
                MapEvent::Tap(scene_index) => marker_action(app, scene_index),
            },
        },
    }
}

/// A click on a marker taps it; a click on a search box focuses it.
fn click_action(column: u16, row: u16, app: &App, tui: &mut TuiState) -> Option<Action> {
    let position = Position::new(column, row);
    if tui.map.inner_area.contains(position) {
        tui.focus = Focus::Map;
        let scene = MapScene::from_app(app)?;
        let scene_index = hit_test(&scene, tui.map.inner_area, column, row)?;
        tui.map.selected = Some(scene_index);
        return marker_action(app, scene_index);
    }
    for slot in SearchSlot::ALL {
        if tui.search_areas[slot.index()].contains(position) {
            tui.focus = Focus::Search(slot);
        }
    }
    None
}

fn marker_action(app: &App, scene_index: usize) -> Option<Action> {
    let scene = MapScene::from_app(app)?;
    let marker = scene.markers.get(scene_index)?;
    Some(Action::MarkerTapped {
        slot: marker.slot,
        index: marker.index,
    })
}

/// Feeds an action through the store and hands the effect to the engine.
/// Returns false when the app should exit.
fn dispatch(store: &mut Store, engine: &mut Engine, action: Action) -> bool {
    match store.dispatch(action) {
        Effect::Quit => false,
        Effect::None => true,
        effect => {
            engine.run(effect);
            true
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let (dispatcher, rx) = Dispatcher::channel();
    let mut engine = Engine::from_config(build_services(&config), dispatcher, &config);
    let mut store = Store::new(App::from_config(&config));
    let mut tui = TuiState::new();

    let needs_redraw = Rc::new(Cell::new(true)); // Force first frame
    let dirty = needs_redraw.clone();
    store.subscribe(move |_, topic| {
        debug!("State changed: {:?}", topic);
        dirty.set(true);
    });

    let mut terminal = ratatui::init();
    // Dropped last: mouse and paste modes are switched off before the screen is restored
    let _restore = OnDrop::new(ratatui::restore);
    let _terminal_mode_guard = TerminalModeGuard::new()?;

    engine.location.start();

    let mut running = true;
    while running {
        if needs_redraw.replace(false) {
            terminal.draw(|f| ui::draw_ui(f, store.app(), &mut tui))?;
        }

        // Process first event + drain ALL pending events before next draw
        let first_event = poll_event_timeout(POLL_TIMEOUT);
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            needs_redraw.set(true);
            if let Some(action) = action_for_event(&event, store.app(), &mut tui)
                && !dispatch(&mut store, &mut engine, action)
            {
                running = false;
                break;
            }
        }

        // Handle background task actions (timers, searches, routes, fixes)
        while running {
            let Ok(action) = rx.try_recv() else { break };
            debug!("Event loop received: {:?}", action);
            running = dispatch(&mut store, &mut engine, action);
        }
    }

    engine.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{Coordinate, Region};
    use crate::test_support::{place, test_app};

    fn app_with_results() -> App {
        let mut app = test_app();
        let user = Coordinate::new(37.1, -122.1);
        app.location.current = Some(user);
        app.camera = Some(Region::around(user, 50_000.0, 50_000.0));
        app.slot_mut(SearchSlot::A).results = vec![place("Blue Bottle", 37.12, -122.12)];
        app.slot_mut(SearchSlot::C).results = vec![
            place("Shell", 37.05, -122.05),
            place("Chevron", 37.0, -122.0),
        ];
        app
    }

    #[test]
    fn test_focus_cycles_through_slots_and_map() {
        let mut focus = Focus::Search(SearchSlot::A);
        let mut seen = Vec::new();
        for _ in 0..4 {
            focus = focus.next();
            seen.push(focus);
        }
        assert_eq!(
            seen,
            vec![
                Focus::Search(SearchSlot::B),
                Focus::Search(SearchSlot::C),
                Focus::Map,
                Focus::Search(SearchSlot::A),
            ]
        );
        assert_eq!(Focus::Search(SearchSlot::A).prev(), Focus::Map);
        assert_eq!(Focus::Map.prev(), Focus::Search(SearchSlot::C));
    }

    #[test]
    fn test_typing_goes_to_focused_slot() {
        let app = test_app();
        let mut tui = TuiState::new();
        action_for_event(&TuiEvent::FocusNext, &app, &mut tui);

        let action = action_for_event(&TuiEvent::InputChar('g'), &app, &mut tui);
        assert_eq!(
            action,
            Some(Action::QueryChanged {
                slot: SearchSlot::B,
                text: "g".to_string()
            })
        );
        assert!(tui.search_boxes[SearchSlot::A.index()].buffer.is_empty());
    }

    #[test]
    fn test_quit_and_submit_in_search() {
        let app = test_app();
        let mut tui = TuiState::new();
        assert_eq!(
            action_for_event(&TuiEvent::Quit, &app, &mut tui),
            Some(Action::Quit)
        );
        assert_eq!(action_for_event(&TuiEvent::Submit, &app, &mut tui), None);
        assert_eq!(tui.focus, Focus::Map);
    }

    #[test]
    fn test_map_keys_become_camera_actions() {
        let app = app_with_results();
        let mut tui = TuiState::new();
        tui.focus = Focus::Map;
        assert!(matches!(
            action_for_event(&TuiEvent::CursorRight, &app, &mut tui),
            Some(Action::PanCamera { east, .. }) if east > 0.0
        ));
        assert_eq!(
            action_for_event(&TuiEvent::InputChar('+'), &app, &mut tui),
            Some(Action::ZoomCamera(0.5))
        );
    }

    #[test]
    fn test_enter_on_selected_marker_taps_it() {
        let app = app_with_results();
        let mut tui = TuiState::new();
        tui.focus = Focus::Map;
        tui.map.marker_count = 3;
        // Scene order is A then C: Blue Bottle, Shell, Chevron
        tui.map.selected = Some(2);

        assert_eq!(
            action_for_event(&TuiEvent::Submit, &app, &mut tui),
            Some(Action::MarkerTapped {
                slot: SearchSlot::C,
                index: 1
            })
        );
    }

    #[test]
    fn test_click_on_marker_taps_it() {
        let app = app_with_results();
        let mut tui = TuiState::new();
        tui.map.inner_area = Rect::new(1, 11, 78, 17);
        let scene = MapScene::from_app(&app).unwrap();
        let target = scene.markers[1].coordinate;
        let (column, row) =
            components::map_view::project(&scene.region, tui.map.inner_area, target).unwrap();

        let action = action_for_event(&TuiEvent::MouseClick(column, row), &app, &mut tui);
        assert_eq!(
            action,
            Some(Action::MarkerTapped {
                slot: SearchSlot::C,
                index: 0
            })
        );
        assert_eq!(tui.focus, Focus::Map);
        assert_eq!(tui.map.selected, Some(1));
    }

    #[test]
    fn test_click_on_search_box_focuses_it() {
        let app = test_app();
        let mut tui = TuiState::new();
        tui.search_areas = [
            Rect::new(0, 1, 80, 3),
            Rect::new(0, 4, 80, 3),
            Rect::new(0, 7, 80, 3),
        ];
        assert_eq!(
            action_for_event(&TuiEvent::MouseClick(10, 8), &app, &mut tui),
            None
        );
        assert_eq!(tui.focus, Focus::Search(SearchSlot::C));
    }

    #[test]
    fn test_cleanup_runs_when_setup_fails() {
        let restored = Cell::new(0);
        let start = || -> std::io::Result<()> {
            let _restore = OnDrop::new(|| restored.set(restored.get() + 1));
            Err(std::io::Error::other("mouse capture unsupported"))?;
            Ok(())
        };

        assert!(start().is_err());
        assert_eq!(restored.get(), 1);
    }
}
