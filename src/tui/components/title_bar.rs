//! # TitleBar Component
//!
//! Top line of the desktop: product name, logged-in user, current screen and
//! the latest status message.
//!
//! Purely presentational. All fields are props copied from `App` each frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub struct TitleBar {
    pub user: String,
    pub screen_title: String,
    pub status_message: String,
    /// Feeds still loading
    pub fetching: bool,
    pub palette: Palette,
}

impl TitleBar {
    pub fn new(user: &str, screen_title: &str, status_message: &str, fetching: bool, palette: Palette) -> Self {
        Self {
            user: user.to_string(),
            screen_title: screen_title.to_string(),
            status_message: status_message.to_string(),
            fetching,
            palette,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                " Zelda TUI OS ",
                self.palette.highlight().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {} | {}", self.user, self.screen_title)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        if self.fetching {
            spans.push(Span::styled(" ⟳", self.palette.hint()));
        }

        let bar = Paragraph::new(Line::from(spans)).style(self.palette.base());
        frame.render_widget(bar, area);
    }
}
