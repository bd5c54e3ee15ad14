use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, List, ListItem};

use crate::core::action::Action;
use crate::core::calculator::Calculator;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::input_box::{InputBox, InputEvent};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

pub struct CalculatorPanel {
    pub input: InputBox,
}

impl Default for CalculatorPanel {
    fn default() -> Self {
        Self {
            input: InputBox::new(" Expression "),
        }
    }
}

impl EventHandler for CalculatorPanel {
    type Event = Action;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Action> {
        // Delete on an empty line wipes the history
        if matches!(event, TuiEvent::Delete) && self.input.buffer.is_empty() {
            return Some(Action::ClearCalculator);
        }
        match self.input.handle_event(event)? {
            InputEvent::Submit(expression) => Some(Action::Calculate(expression)),
            InputEvent::ContentChanged => None,
        }
    }
}

pub struct CalculatorView<'a> {
    panel: &'a mut CalculatorPanel,
    calculator: &'a Calculator,
    palette: Palette,
}

impl<'a> CalculatorView<'a> {
    pub fn new(panel: &'a mut CalculatorPanel, calculator: &'a Calculator, palette: Palette) -> Self {
        Self {
            panel,
            calculator,
            palette,
        }
    }
}

impl Component for CalculatorView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [input_area, history_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

        self.panel.input.render_with(frame, input_area, &self.palette);

        // Newest entries at the bottom, like a paper roll
        let visible = history_area.height.saturating_sub(2) as usize;
        let skip = self.calculator.history.len().saturating_sub(visible);
        let items: Vec<ListItem> = self
            .calculator
            .history
            .iter()
            .skip(skip)
            .map(|entry| ListItem::new(entry.display()))
            .collect();

        let title = match self.calculator.last_result() {
            Some(result) => format!(" History (last = {result}) "),
            None => " History ".to_string(),
        };
        let list = List::new(items)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(self.palette.border(false))
                    .title(title)
                    .title_bottom(Line::from(" Enter Evaluate  Del Clear history ").centered()),
            )
            .style(self.palette.base());
        frame.render_widget(list, history_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_emits_calculate() {
        let mut panel = CalculatorPanel::default();
        for c in "2*21".chars() {
            assert!(panel.handle_event(&TuiEvent::InputChar(c)).is_none());
        }
        match panel.handle_event(&TuiEvent::Submit) {
            Some(Action::Calculate(expr)) => assert_eq!(expr, "2*21"),
            other => panic!("expected Calculate, got {other:?}"),
        }
        assert!(panel.input.buffer.is_empty());
    }

    #[test]
    fn test_delete_on_empty_clears_history() {
        let mut panel = CalculatorPanel::default();
        assert!(matches!(
            panel.handle_event(&TuiEvent::Delete),
            Some(Action::ClearCalculator)
        ));
        panel.handle_event(&TuiEvent::InputChar('1'));
        panel.handle_event(&TuiEvent::CursorHome);
        assert!(panel.handle_event(&TuiEvent::Delete).is_none());
        assert!(panel.input.buffer.is_empty());
    }
}
