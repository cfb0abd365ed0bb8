//! # SearchBox Component
//!
//! Single-line text input for one search slot.
//!
//! ## Responsibilities
//!
//! - Capture text input and editing (backspace, delete, cursor movement, paste)
//! - Show the slot placeholder ("Search A...") while empty
//! - Emit `SearchBoxEvent::Changed` on every edit so the slot can debounce it
//!
//! The buffer is internal state. `focused` and `searching` are props synced
//! from the TUI and App state before each render.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::slot::SearchSlot;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::map_view::slot_color;
use crate::tui::event::TuiEvent;

/// High-level events emitted by the SearchBox
#[derive(Debug, Clone, PartialEq)]
pub enum SearchBoxEvent {
    /// The text changed; carries the full new text.
    Changed(String),
}

pub struct SearchBox {
    pub slot: SearchSlot,
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Whether keyboard input goes here (Prop)
    pub focused: bool,
    /// Whether the slot has a search in flight (Prop)
    pub searching: bool,
    /// Cursor position as byte offset in buffer
    cursor: usize,
}

impl SearchBox {
    pub fn new(slot: SearchSlot) -> Self {
        Self {
            slot,
            buffer: String::new(),
            focused: false,
            searching: false,
            cursor: 0,
        }
    }

    fn changed(&self) -> Option<SearchBoxEvent> {
        Some(SearchBoxEvent::Changed(self.buffer.clone()))
    }
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl Component for SearchBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let color = slot_color(self.slot);
        let border_style = if self.focused {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        let mut title = format!("Slot {}", self.slot);
        if self.searching {
            title.push_str(" (searching)");
        }
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title);

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(self.slot.placeholder()).style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.buffer.as_str())
        };
        frame.render_widget(paragraph.block(block), area);

        if self.focused {
            // Text wider than the terminal pins the cursor to the right border
            let column = u16::try_from(self.buffer[..self.cursor].width()).unwrap_or(u16::MAX);
            let max_x = area.x.saturating_add(area.width.saturating_sub(2));
            let cursor_x = area.x.saturating_add(1).saturating_add(column).min(max_x);
            frame.set_cursor_position((cursor_x, area.y.saturating_add(1)));
        }
    }
}

impl EventHandler for SearchBox {
    type Event = SearchBoxEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                self.changed()
            }
            TuiEvent::Paste(text) => {
                // Single line: pasted newlines become spaces
                let text = text.replace(['\r', '\n'], " ");
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                self.changed()
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                    self.changed()
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(self.cursor..next);
                    self.changed()
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorRight => {
                if self.cursor < self.buffer.len() {
                    self.cursor = next_char_boundary(&self.buffer, self.cursor);
                }
                None
            }
            TuiEvent::CursorHome => {
                self.cursor = 0;
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer.len();
                None
            }
            _ => None,
        }
    }
}
