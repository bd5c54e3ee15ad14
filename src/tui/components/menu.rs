//! # Main Menu
//!
//! One button per screen plus Exit. Follows the persistent state + transient
//! wrapper pattern: `MenuState` lives in `TuiState`, `Menu` is built per frame.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState};

use crate::core::action::Action;
use crate::core::state::{MENU, MenuItem};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

pub struct MenuState {
    pub selected: usize,
    pub list_state: ListState,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            selected: 0,
            list_state: ListState::default().with_selected(Some(0)),
        }
    }
}

impl MenuState {
    fn select(&mut self, index: usize) {
        self.selected = index.min(MENU.len() - 1);
        self.list_state.select(Some(self.selected));
    }

    fn activate(&self) -> Option<Action> {
        MENU.get(self.selected).map(|item| match item {
            MenuItem::Open(screen) => Action::Open(*screen),
            MenuItem::Exit => Action::Quit,
        })
    }
}

impl EventHandler for MenuState {
    type Event = Action;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Action> {
        match event {
            TuiEvent::CursorUp => {
                // wrap around to Exit
                let index = self.selected.checked_sub(1).unwrap_or(MENU.len() - 1);
                self.select(index);
                None
            }
            TuiEvent::CursorDown => {
                self.select((self.selected + 1) % MENU.len());
                None
            }
            TuiEvent::CursorHome => {
                self.select(0);
                None
            }
            TuiEvent::CursorEnd => {
                self.select(MENU.len() - 1);
                None
            }
            TuiEvent::Submit => self.activate(),
            TuiEvent::InputChar('r') => Some(Action::RefreshFeeds),
            TuiEvent::InputChar('q') => Some(Action::Quit),
            _ => None,
        }
    }
}

pub struct Menu<'a> {
    state: &'a mut MenuState,
    palette: Palette,
}

impl<'a> Menu<'a> {
    pub fn new(state: &'a mut MenuState, palette: Palette) -> Self {
        Self { state, palette }
    }
}

impl Component for Menu<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = 34u16.min(area.width);
        let height = (MENU.len() as u16 + 2).min(area.height);
        let [_, column, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, menu_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .areas(column);

        let items: Vec<ListItem> = MENU
            .iter()
            .map(|item| ListItem::new(Line::from(item.label()).centered()))
            .collect();
        let list = List::new(items)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(self.palette.border(true))
                    .title(" Zelda TUI OS ")
                    .title_bottom(Line::from(" ↑↓ Select  Enter Open  r Refresh  q Quit ").centered()),
            )
            .style(self.palette.base())
            .highlight_style(self.palette.highlight());

        frame.render_stateful_widget(list, menu_area, &mut self.state.list_state);
    }
}
