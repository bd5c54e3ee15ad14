//! # InputBox Component
//!
//! Single-line text field used by the calculator, chess, mail and notes
//! screens.
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `title` and `focused` are props
//! the owning panel sets before rendering. Lines wider than the field scroll
//! horizontally so the cursor always stays visible; widths are measured in
//! terminal columns, not bytes.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// Border width on each side of the field
const BORDER_OFFSET: u16 = 1;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed on a non-empty buffer; the buffer is cleared
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Cursor position as a byte offset into `buffer`
    cursor: usize,
    /// Block title (Prop)
    pub title: String,
    /// Whether keystrokes currently go here (Prop)
    pub focused: bool,
}

impl InputBox {
    pub fn new(title: &str) -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            title: title.to_string(),
            focused: true,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Take the buffer, leaving the field empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Byte offset where visible text starts, and the cursor column relative to it.
    fn visible_window(&self, inner_width: usize) -> (usize, usize) {
        let mut column = self.buffer[..self.cursor].width();
        let mut start = 0;
        while inner_width > 0 && column >= inner_width && start < self.cursor {
            let Some(ch) = self.buffer[start..].chars().next() else {
                break;
            };
            column -= ch.width().unwrap_or(0);
            start += ch.len_utf8();
        }
        (start, column)
    }

    pub fn render_with(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let inner_width = area.width.saturating_sub(2 * BORDER_OFFSET) as usize;
        let (start, column) = self.visible_window(inner_width);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(palette.border(self.focused))
            .title(self.title.as_str());
        let input = Paragraph::new(&self.buffer[start..])
            .block(block)
            .style(palette.base());
        frame.render_widget(input, area);

        if self.focused && area.height > 2 {
            let max_x = area.x + area.width.saturating_sub(BORDER_OFFSET + 1);
            let x = (area.x + BORDER_OFFSET + column as u16).min(max_x);
            frame.set_cursor_position((x, area.y + BORDER_OFFSET));
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.render_with(frame, area, &crate::tui::theme::palette(Default::default()));
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single line: newlines in pasted text become spaces
                let text = text.replace(['\r', '\n'], " ");
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    None
                } else {
                    Some(InputEvent::Submit(self.take()))
                }
            }
            _ => None,
        }
    }
}
