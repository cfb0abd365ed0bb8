//! # StatusBar Component
//!
//! Bottom line: key hints for the focused area on the left, the active route
//! summary on the right.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;

use crate::core::geo::{RouteGeometry, TravelMode};
use crate::tui::component::Component;

const SEARCH_HINTS: &str = "Tab: next | Esc: quit";
const MAP_HINTS: &str = "Arrows: pan | +/-: zoom | n/p: select | Enter: route | Tab: next | Esc: quit";

pub struct StatusBar<'a> {
    /// Current route (Prop)
    pub route: Option<&'a RouteGeometry>,
    pub travel_mode: TravelMode,
    /// Whether the map has focus, which changes the hints (Prop)
    pub map_focused: bool,
}

/// "850 m" below a kilometer, "3.2 km" above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

/// "45 s", "12 min" or "1 h 05 min".
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    if total < 60 {
        format!("{} s", total)
    } else if total < 3600 {
        format!("{} min", (total + 30) / 60)
    } else {
        let minutes = (total + 30) / 60;
        format!("{} h {:02} min", minutes / 60, minutes % 60)
    }
}

impl Component for StatusBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let hints = if self.map_focused { MAP_HINTS } else { SEARCH_HINTS };
        let summary = self
            .route
            .map(|route| {
                format!(
                    "Route ({}): {}, {}",
                    self.travel_mode.label(),
                    format_distance(route.distance_m),
                    format_duration(route.duration_s)
                )
            })
            .unwrap_or_default();

        let [left, right] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(summary.chars().count() as u16),
        ])
        .areas(area);

        frame.render_widget(
            Line::styled(hints, Style::default().fg(Color::DarkGray)),
            left,
        );
        frame.render_widget(
            Line::styled(summary, Style::default().fg(Color::Blue)),
            right,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Coordinate;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(850.4), "850 m");
        assert_eq!(format_distance(3240.0), "3.2 km");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45.0), "45 s");
        assert_eq!(format_duration(720.0), "12 min");
        assert_eq!(format_duration(3900.0), "1 h 05 min");
    }

    #[test]
    fn test_render_route_summary() {
        let route = RouteGeometry {
            polyline: vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.1)],
            distance_m: 3240.0,
            duration_s: 420.0,
        };
        let mut bar = StatusBar {
            route: Some(&route),
            travel_mode: TravelMode::Automobile,
            map_focused: false,
        };
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| bar.render(f, f.area())).unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Tab: next"));
        assert!(text.contains("Route (automobile): 3.2 km, 7 min"));
    }
}
