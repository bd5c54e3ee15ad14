use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Paragraph};

use crate::core::action::Action;
use crate::core::files::FileBrowser;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// Selection lives in `FileBrowser`; this only keeps the scroll offset.
#[derive(Default)]
pub struct FilesPanel {
    list_state: ListState,
}

impl EventHandler for FilesPanel {
    type Event = Action;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Action> {
        match event {
            TuiEvent::CursorUp => Some(Action::FileSelectPrev),
            TuiEvent::CursorDown => Some(Action::FileSelectNext),
            TuiEvent::Submit | TuiEvent::CursorRight => Some(Action::FileOpen),
            TuiEvent::Backspace | TuiEvent::CursorLeft => Some(Action::FileUp),
            TuiEvent::InputChar('r') => Some(Action::FileRefresh),
            _ => None,
        }
    }
}

pub struct FilesView<'a> {
    panel: &'a mut FilesPanel,
    browser: &'a FileBrowser,
    palette: Palette,
}

impl<'a> FilesView<'a> {
    pub fn new(panel: &'a mut FilesPanel, browser: &'a FileBrowser, palette: Palette) -> Self {
        Self {
            panel,
            browser,
            palette,
        }
    }
}

impl Component for FilesView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let error_height = u16::from(self.browser.error.is_some());
        let [list_area, error_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(error_height)]).areas(area);

        let items: Vec<ListItem> = if self.browser.entries.is_empty() {
            vec![ListItem::new(Line::styled("(empty)", self.palette.hint()))]
        } else {
            self.browser
                .entries
                .iter()
                .map(|entry| {
                    let style = if entry.is_dir {
                        Style::default().fg(self.palette.accent)
                    } else {
                        Style::default()
                    };
                    ListItem::new(Line::styled(entry.label(), style))
                })
                .collect()
        };

        let selected = (!self.browser.entries.is_empty()).then_some(self.browser.selected);
        self.panel.list_state.select(selected);

        let list = List::new(items)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(self.palette.border(true))
                    .title(format!(" {} ", self.browser.path.display()))
                    .title_bottom(
                        Line::from(" ↑↓ Select  Enter Open  Backspace Up  r Refresh ").centered(),
                    ),
            )
            .style(self.palette.base())
            .highlight_style(self.palette.highlight())
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, list_area, &mut self.panel.list_state);

        if let Some(error) = &self.browser.error {
            let error = Paragraph::new(Line::styled(
                format!("Error: {error}"),
                Style::default().fg(ratatui::style::Color::Red),
            ));
            frame.render_widget(error, error_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::Background;
    use crate::tui::theme::palette;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_keys_map_to_file_actions() {
        let mut panel = FilesPanel::default();
        assert!(matches!(panel.handle_event(&TuiEvent::CursorDown), Some(Action::FileSelectNext)));
        assert!(matches!(panel.handle_event(&TuiEvent::Submit), Some(Action::FileOpen)));
        assert!(matches!(panel.handle_event(&TuiEvent::Backspace), Some(Action::FileUp)));
        assert!(matches!(panel.handle_event(&TuiEvent::InputChar('r')), Some(Action::FileRefresh)));
        assert!(panel.handle_event(&TuiEvent::InputChar('x')).is_none());
    }

    #[test]
    fn test_render_lists_directories_with_slash() {
        let dir = std::env::temp_dir().join(format!("zelda-files-view-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(dir.join("docs")).unwrap();
        std::fs::write(dir.join("readme.txt"), "hi").unwrap();
        let browser = FileBrowser::new(dir.clone());

        let mut panel = FilesPanel::default();
        let backend = TestBackend::new(60, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                FilesView::new(&mut panel, &browser, palette(Background::Forest)).render(f, f.area())
            })
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("> docs/"));
        assert!(text.contains("readme.txt"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
