//! # MapView Component
//!
//! Draws a `MapScene` on a Braille canvas: the route polyline first, then the
//! user and result markers on a layer above it.
//!
//! ## Architecture
//!
//! - **MapView** (Component): renders one frame from the scene it is handed.
//! - **MapViewState** (Persistent State): keyboard selection and the inner
//!   area of the last frame, which mouse hit testing needs.
//!
//! ```text
//! ┌ Map ───────────────────────────┐
//! │        ● Blue Bottle           │
//! │          ⠑⠢⢄                   │
//! │             ⠑◉ You   ● Philz   │
//! └────────────────────────────────┘
//! ```
//!
//! Projection is a plain equirectangular mapping of the scene region onto the
//! inner area. `project` and `hit_test` are pure so they can be tested
//! without a terminal.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::geo::{Coordinate, Region};
use crate::core::scene::MapScene;
use crate::core::slot::SearchSlot;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Fraction of the visible window one arrow press moves the camera.
const PAN_STEP: f64 = 0.25;
const ZOOM_IN_FACTOR: f64 = 0.5;
const ZOOM_OUT_FACTOR: f64 = 2.0;

pub const USER_COLOR: Color = Color::Blue;
pub const ROUTE_COLOR: Color = Color::Blue;

/// Pin color for a slot's results.
pub fn slot_color(slot: SearchSlot) -> Color {
    match slot {
        SearchSlot::A => Color::Red,
        SearchSlot::B => Color::Green,
        SearchSlot::C => Color::Magenta,
    }
}

/// High-level events emitted by the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Pan { north: f64, east: f64 },
    Zoom(f64),
    /// The marker at this index of `MapScene::markers` was chosen.
    Tap(usize),
}

/// Persistent state for the map across frames.
#[derive(Debug, Default)]
pub struct MapViewState {
    /// Keyboard-selected marker (index into the scene's markers)
    pub selected: Option<usize>,
    /// Marker count of the last rendered scene, bounds `selected`
    pub marker_count: usize,
    /// Canvas area of the last frame, used for mouse hit testing
    pub inner_area: Rect,
}

impl MapViewState {
    pub fn new() -> Self {
        Self::default()
    }

    fn select_next(&mut self) {
        if self.marker_count == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.marker_count,
            None => 0,
        });
    }

    fn select_prev(&mut self) {
        if self.marker_count == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => self.marker_count - 1,
            Some(i) => i - 1,
        });
    }
}

impl EventHandler for MapViewState {
    type Event = MapEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp => Some(MapEvent::Pan {
                north: PAN_STEP,
                east: 0.0,
            }),
            TuiEvent::CursorDown => Some(MapEvent::Pan {
                north: -PAN_STEP,
                east: 0.0,
            }),
            TuiEvent::CursorLeft => Some(MapEvent::Pan {
                north: 0.0,
                east: -PAN_STEP,
            }),
            TuiEvent::CursorRight => Some(MapEvent::Pan {
                north: 0.0,
                east: PAN_STEP,
            }),
            TuiEvent::InputChar('+') | TuiEvent::InputChar('=') => {
                Some(MapEvent::Zoom(ZOOM_IN_FACTOR))
            }
            TuiEvent::InputChar('-') => Some(MapEvent::Zoom(ZOOM_OUT_FACTOR)),
            TuiEvent::InputChar('n') => {
                self.select_next();
                None
            }
            TuiEvent::InputChar('p') => {
                self.select_prev();
                None
            }
            TuiEvent::Submit => self.selected.map(MapEvent::Tap),
            _ => None,
        }
    }
}

/// Terminal cell a coordinate lands on inside `inner`, if it is visible.
///
/// Mirrors the canvas label placement (scale, then truncate) so a click on a
/// drawn marker maps back to that marker.
pub fn project(region: &Region, inner: Rect, coord: Coordinate) -> Option<(u16, u16)> {
    if inner.width == 0 || inner.height == 0 || !region.contains(coord) {
        return None;
    }
    let (west, east) = (region.west(), region.east());
    let (south, north) = (region.south(), region.north());
    let x_resolution = f64::from(inner.width) - 1.0;
    let y_resolution = f64::from(inner.height) - 1.0;
    let column = ((coord.longitude - west) * x_resolution / (east - west)) as u16;
    let row = ((north - coord.latitude) * y_resolution / (north - south)) as u16;
    Some((inner.x + column, inner.y + row))
}

/// Index of the marker nearest to a click, within one cell.
pub fn hit_test(scene: &MapScene, inner: Rect, column: u16, row: u16) -> Option<usize> {
    scene
        .markers
        .iter()
        .enumerate()
        .filter_map(|(index, marker)| {
            let (x, y) = project(&scene.region, inner, marker.coordinate)?;
            let distance = x.abs_diff(column).max(y.abs_diff(row));
            (distance <= 1).then_some((distance, index))
        })
        .min()
        .map(|(_, index)| index)
}

/// The map widget for one frame.
pub struct MapView<'a> {
    /// What to draw (Prop); `None` until the first location fix
    pub scene: Option<&'a MapScene<'a>>,
    /// Selection and layout memory (Persistent State)
    pub state: &'a mut MapViewState,
    /// Whether keyboard input goes to the map (Prop)
    pub focused: bool,
    /// A route is being calculated (Prop)
    pub routing: bool,
}

impl Component for MapView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default()
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let title = if self.routing { "Map (routing...)" } else { "Map" };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title);
        self.state.inner_area = block.inner(area);

        let Some(scene) = self.scene else {
            self.state.marker_count = 0;
            self.state.selected = None;
            let placeholder = Paragraph::new("Waiting for location...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        };

        self.state.marker_count = scene.markers.len();
        if self.state.selected.is_some_and(|i| i >= scene.markers.len()) {
            self.state.selected = None;
        }
        let selected = self.state.selected;
        let region = scene.region;

        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds([region.west(), region.east()])
            .y_bounds([region.south(), region.north()])
            .paint(|ctx| {
                if let Some(route) = scene.route {
                    for (from, to) in route.segments() {
                        ctx.draw(&CanvasLine::new(
                            from.longitude,
                            from.latitude,
                            to.longitude,
                            to.latitude,
                            ROUTE_COLOR,
                        ));
                    }
                }
                ctx.layer();

                for (index, marker) in scene.markers.iter().enumerate() {
                    let mut style = Style::default().fg(slot_color(marker.slot));
                    if selected == Some(index) {
                        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                    }
                    ctx.print(
                        marker.coordinate.longitude,
                        marker.coordinate.latitude,
                        Line::from(Span::styled(format!("● {}", marker.label), style)),
                    );
                }
                ctx.print(
                    scene.user.longitude,
                    scene.user.latitude,
                    Line::from(Span::styled(
                        "◉ You",
                        Style::default().fg(USER_COLOR).add_modifier(Modifier::BOLD),
                    )),
                );
            });
        frame.render_widget(canvas, area);
    }
}
