use crate::core::scene::MapScene;
use crate::core::slot::SearchSlot;
use crate::core::state::{App, AuthorizationState};
use crate::tui::component::Component;
use crate::tui::components::{MapView, StatusBar, TitleBar};
use crate::tui::{Focus, TuiState};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

/// Height of one bordered search box.
const SEARCH_BOX_HEIGHT: u16 = 3;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([
        Length(1),
        Length(SEARCH_BOX_HEIGHT),
        Length(SEARCH_BOX_HEIGHT),
        Length(SEARCH_BOX_HEIGHT),
        Min(0),
        Length(1),
    ]);
    let [title_area, a_area, b_area, c_area, map_area, status_area] = layout.areas(frame.area());

    TitleBar::new(status_message(app)).render(frame, title_area);

    for (slot, area) in SearchSlot::ALL.into_iter().zip([a_area, b_area, c_area]) {
        let search_box = &mut tui.search_boxes[slot.index()];
        search_box.focused = tui.focus == Focus::Search(slot);
        search_box.searching = app.slot(slot).in_flight;
        search_box.render(frame, area);
        tui.search_areas[slot.index()] = area;
    }

    let scene = MapScene::from_app(app);
    MapView {
        scene: scene.as_ref(),
        state: &mut tui.map,
        focused: tui.focus == Focus::Map,
        routing: app.route.pending,
    }
    .render(frame, map_area);

    StatusBar {
        route: app.route.geometry.as_ref(),
        travel_mode: app.travel_mode,
        map_focused: tui.focus == Focus::Map,
    }
    .render(frame, status_area);
}

/// One-line summary of location and search activity for the title bar.
pub fn status_message(app: &App) -> String {
    let location = match (app.location.authorization, app.location.current) {
        (AuthorizationState::Denied | AuthorizationState::Restricted, _) => {
            format!("Location {}", app.location.authorization.label())
        }
        (_, None) => "Locating...".to_string(),
        (_, Some(coord)) => format!("{:.4}, {:.4}", coord.latitude, coord.longitude),
    };
    match app.searches_in_flight() {
        0 => location,
        1 => format!("{} | Searching 1 slot", location),
        n => format!("{} | Searching {} slots", location, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Coordinate;
    use crate::core::state::SlotPhase;
    use crate::test_support::{place, test_app};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::style::Color;

    #[test]
    fn test_status_message_locating() {
        let app = test_app();
        assert_eq!(status_message(&app), "Locating...");
    }

    #[test]
    fn test_status_message_denied_and_searching() {
        let mut app = test_app();
        app.location.authorization = AuthorizationState::Denied;
        app.slot_mut(SearchSlot::A).phase = SlotPhase::Searching;
        app.slot_mut(SearchSlot::C).phase = SlotPhase::Searching;
        assert_eq!(status_message(&app), "Location denied | Searching 2 slots");
    }

    #[test]
    fn test_status_message_shows_fix() {
        let mut app = test_app();
        app.location.current = Some(Coordinate::new(37.33490, -122.00900));
        assert_eq!(status_message(&app), "37.3349, -122.0090");
    }

    #[test]
    fn test_draw_ui_records_areas() {
        let mut app = test_app();
        app.location.current = Some(Coordinate::new(37.0, -122.0));
        app.slot_mut(SearchSlot::A).results = vec![place("Blue Bottle", 37.01, -122.01)];
        let mut tui = TuiState::new();

        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, &app, &mut tui)).unwrap();

        assert_eq!(tui.search_areas[0], Rect::new(0, 1, 80, 3));
        assert_eq!(tui.search_areas[2], Rect::new(0, 7, 80, 3));
        assert_eq!(tui.map.inner_area, Rect::new(1, 11, 78, 17));
        assert_eq!(tui.map.marker_count, 1);

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Where To?"));
        assert!(text.contains("Search A..."));
        assert!(text.contains("Blue Bottle"));

        let buffer = terminal.backend().buffer();
        let dot = buffer
            .content()
            .iter()
            .position(|c| c.symbol() == "●")
            .unwrap();
        let (x, y) = buffer.pos_of(dot);
        assert_eq!(buffer[(x + 2, y)].symbol(), "B");
        assert_eq!(buffer[(x, y)].fg, Color::Red);
    }
}
