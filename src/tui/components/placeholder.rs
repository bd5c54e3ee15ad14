use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::Component;
use crate::tui::theme::Palette;

/// A screen that only says it is coming soon.
pub struct Placeholder {
    pub title: &'static str,
    pub text: &'static str,
    pub palette: Palette,
}

impl Component for Placeholder {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.palette.border(true))
            .title(format!(" {} ", self.title))
            .style(self.palette.base());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [_, text_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(inner);
        let paragraph = Paragraph::new(vec![
            Line::from(self.text),
            Line::raw(""),
            Line::styled("Press Esc to go back", self.palette.hint()),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, text_area);
    }
}
