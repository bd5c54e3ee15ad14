use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::action::Action;
use crate::core::maze::{Direction, Maze};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// Arrow keys or WASD move; r restarts, n loads the next maze.
pub struct MazeControls;

impl EventHandler for MazeControls {
    type Event = Action;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Action> {
        let direction = match event {
            TuiEvent::CursorUp | TuiEvent::InputChar('w') => Direction::Up,
            TuiEvent::CursorDown | TuiEvent::InputChar('s') => Direction::Down,
            TuiEvent::CursorLeft | TuiEvent::InputChar('a') => Direction::Left,
            TuiEvent::CursorRight | TuiEvent::InputChar('d') => Direction::Right,
            TuiEvent::InputChar('r') => return Some(Action::ResetMaze),
            TuiEvent::InputChar('n') => return Some(Action::NextMaze),
            _ => return None,
        };
        Some(Action::MoveMaze(direction))
    }
}

pub struct MazeView<'a> {
    maze: &'a Maze,
    palette: Palette,
}

impl<'a> MazeView<'a> {
    pub fn new(maze: &'a Maze, palette: Palette) -> Self {
        Self { maze, palette }
    }

    fn styled_lines(&self) -> Vec<Line<'static>> {
        let wall = Style::default().fg(self.palette.muted);
        let player = self.palette.highlight();
        let exit = Style::default().fg(self.palette.accent);
        self.maze
            .render_lines()
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .chars()
                    .map(|c| match c {
                        '#' => Span::styled("█", wall),
                        '@' => Span::styled("@", player),
                        'E' => Span::styled("E", exit),
                        other => Span::raw(other.to_string()),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl Component for MazeView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = format!(
            " Maze {}/{}  moves: {} ",
            self.maze.level % Maze::level_count() + 1,
            Maze::level_count(),
            self.maze.moves
        );
        let mut lines = self.styled_lines();
        lines.push(Line::raw(""));
        if self.maze.escaped {
            lines.push(Line::styled("You found the exit!", self.palette.highlight()));
        } else {
            lines.push(Line::styled("Reach the E.", self.palette.hint()));
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(self.palette.border(true))
                    .title(title)
                    .title_bottom(Line::from(" ←↑↓→/WASD Move  r Restart  n Next maze ").centered()),
            )
            .style(self.palette.base());
        frame.render_widget(paragraph, area);
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
    fn test_controls_map_to_actions() {
        let mut controls = MazeControls;
        assert!(matches!(
            controls.handle_event(&TuiEvent::CursorLeft),
            Some(Action::MoveMaze(Direction::Left))
        ));
        assert!(matches!(
            controls.handle_event(&TuiEvent::InputChar('s')),
            Some(Action::MoveMaze(Direction::Down))
        ));
        assert!(matches!(controls.handle_event(&TuiEvent::InputChar('n')), Some(Action::NextMaze)));
        assert!(controls.handle_event(&TuiEvent::Submit).is_none());
    }

    #[test]
    fn test_render_draws_player() {
        let maze = Maze::builtin(0);
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| MazeView::new(&maze, palette(Background::Classic)).render(f, f.area()))
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains('@'));
        assert!(text.contains('E'));
        assert!(text.contains("moves: 0"));
    }
}
