use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Gauge, Paragraph};

use crate::core::action::Action;
use crate::core::pomodoro::{Pomodoro, WORK_SECONDS};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// s starts, p pauses, r resets. Enter toggles.
pub struct PomodoroControls {
    /// Prop synced from `App` before each event
    pub running: bool,
}

impl EventHandler for PomodoroControls {
    type Event = Action;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Action> {
        match event {
            TuiEvent::InputChar('s') => Some(Action::PomodoroStart),
            TuiEvent::InputChar('p') => Some(Action::PomodoroStop),
            TuiEvent::InputChar('r') => Some(Action::PomodoroReset),
            TuiEvent::Submit | TuiEvent::InputChar(' ') => Some(if self.running {
                Action::PomodoroStop
            } else {
                Action::PomodoroStart
            }),
            _ => None,
        }
    }
}

pub struct PomodoroView<'a> {
    pomodoro: &'a Pomodoro,
    palette: Palette,
}

impl<'a> PomodoroView<'a> {
    pub fn new(pomodoro: &'a Pomodoro, palette: Palette) -> Self {
        Self { pomodoro, palette }
    }
}

impl Component for PomodoroView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.palette.border(true))
            .title(" Pomodoro ")
            .title_bottom(Line::from(" s Start  p Pause  r Reset  Enter Toggle ").centered())
            .style(self.palette.base());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [_, text_area, gauge_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(inner);

        let state = if self.pomodoro.running {
            "running"
        } else if self.pomodoro.time_left == 0 {
            "done"
        } else {
            "paused"
        };
        let text = Paragraph::new(vec![
            Line::from(self.pomodoro.display()),
            Line::styled(state, self.palette.hint()),
            Line::from(format!("Completed today: {}", self.pomodoro.completed)),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(text, text_area);

        let elapsed = WORK_SECONDS - self.pomodoro.time_left.min(WORK_SECONDS);
        let gauge = Gauge::default()
            .gauge_style(self.palette.border(true))
            .ratio(f64::from(elapsed) / f64::from(WORK_SECONDS));
        frame.render_widget(gauge, gauge_area);
    }
}
