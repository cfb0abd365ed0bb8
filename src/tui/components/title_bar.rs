//! # TitleBar Component
//!
//! Top bar with the fixed app title and a short status.
//!
//! TitleBar is purely presentational: it receives all data as props and has
//! no internal state.
//!
//! 1. **Status message**: `"Where To? | Locating..."`
//! 2. **Default**: `"Where To?"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

pub const APP_TITLE: &str = "Where To?";

/// Top status bar component showing the title and status.
pub struct TitleBar {
    /// Status message (e.g., "Locating...", "Searching 2 slots")
    pub status_message: String,
}

impl TitleBar {
    pub fn new(status_message: String) -> Self {
        Self { status_message }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            APP_TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
