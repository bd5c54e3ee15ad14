use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Paragraph};

use crate::core::action::Action;
use crate::core::layout::{Background, Layout as DesktopLayout};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::{Palette, palette};

pub struct BackgroundsPanel {
    list_state: ListState,
}

impl Default for BackgroundsPanel {
    fn default() -> Self {
        Self {
            list_state: ListState::default().with_selected(Some(0)),
        }
    }
}

impl BackgroundsPanel {
    pub fn selected(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    /// Point the cursor at the background currently in use.
    pub fn select_current(&mut self, current: Background) {
        let index = Background::ALL.iter().position(|b| *b == current).unwrap_or(0);
        self.list_state.select(Some(index));
    }
}

impl EventHandler for BackgroundsPanel {
    type Event = Action;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Action> {
        let last = Background::ALL.len() - 1;
        match event {
            TuiEvent::CursorUp => {
                self.list_state.select(Some(self.selected().saturating_sub(1)));
                None
            }
            TuiEvent::CursorDown => {
                self.list_state.select(Some((self.selected() + 1).min(last)));
                None
            }
            TuiEvent::Submit => Background::ALL
                .get(self.selected())
                .map(|b| Action::SelectBackground(*b)),
            TuiEvent::InputChar('w') => Some(Action::ToggleWeather),
            TuiEvent::InputChar('n') => Some(Action::ToggleNews),
            _ => None,
        }
    }
}

pub struct BackgroundsView<'a> {
    panel: &'a mut BackgroundsPanel,
    layout: &'a DesktopLayout,
    palette: Palette,
}

impl<'a> BackgroundsView<'a> {
    pub fn new(panel: &'a mut BackgroundsPanel, layout: &'a DesktopLayout, palette: Palette) -> Self {
        Self {
            panel,
            layout,
            palette,
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

impl Component for BackgroundsView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [list_area, toggles_area] =
            Layout::vertical([Constraint::Length(Background::ALL.len() as u16 + 2), Constraint::Min(0)])
                .areas(area);

        // Each entry is previewed in its own colours
        let items: Vec<ListItem> = Background::ALL
            .iter()
            .map(|background| {
                let preview = palette(*background);
                let marker = if *background == self.layout.background { "●" } else { " " };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{marker} ")),
                    Span::styled(
                        format!(" {:<10}", background.label()),
                        preview.base().fg(preview.accent),
                    ),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(self.palette.border(true))
                    .title(" Background "),
            )
            .style(self.palette.base())
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, list_area, &mut self.panel.list_state);

        let toggles = Paragraph::new(vec![
            Line::from(format!("Weather on dashboard: {}", on_off(self.layout.show_weather))),
            Line::from(format!("News on dashboard:    {}", on_off(self.layout.show_news))),
            Line::raw(""),
            Line::styled("↑↓ Select  Enter Apply  w Toggle weather  n Toggle news", self.palette.hint()),
        ])
        .style(self.palette.base());
        frame.render_widget(toggles, toggles_area);
    }
}
