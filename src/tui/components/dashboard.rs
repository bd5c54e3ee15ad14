//! # Dashboard
//!
//! Clock, weather and news lines above every screen. The clock is formatted
//! from the time passed in, so tests can pin it.

use chrono::{DateTime, TimeZone};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::clock::clock_line;
use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub struct Dashboard {
    pub clock: String,
    pub weather: Option<String>,
    pub news: Option<String>,
    /// Reminders whose time has come
    pub due_reminders: usize,
    pub palette: Palette,
}

impl Dashboard {
    pub fn new<Tz: TimeZone>(now: &DateTime<Tz>, palette: Palette) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            clock: clock_line(now),
            weather: None,
            news: None,
            due_reminders: 0,
            palette,
        }
    }

    /// Rows needed, including the bottom border.
    pub fn height(show_weather: bool, show_news: bool) -> u16 {
        2 + u16::from(show_weather) + u16::from(show_news)
    }

    fn lines(&self) -> Vec<Line<'_>> {
        let mut clock = vec![Span::raw(self.clock.as_str())];
        if self.due_reminders > 0 {
            clock.push(Span::styled(
                format!("   ⏰ {} reminder(s) due", self.due_reminders),
                self.palette.highlight(),
            ));
        }
        let mut lines = vec![Line::from(clock)];
        lines.extend(self.weather.as_deref().map(Line::raw));
        lines.extend(self.news.as_deref().map(Line::raw));
        lines
    }
}

impl Component for Dashboard {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(self.palette.border(false));
        let paragraph = Paragraph::new(self.lines())
            .block(block)
            .style(self.palette.base());
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::Background;
    use crate::tui::theme::palette;
    use chrono::Utc;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_dashboard_renders_enabled_feeds_only() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 5, 3).unwrap();
        let mut dashboard = Dashboard::new(&now, palette(Background::Classic));
        dashboard.weather = Some("Weather: sunny".to_string());
        dashboard.due_reminders = 2;

        let backend = TestBackend::new(80, Dashboard::height(true, false));
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| dashboard.render(f, f.area())).unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("09:05:03"));
        assert!(text.contains("Weather: sunny"));
        assert!(text.contains("2 reminder(s) due"));
        assert!(!text.contains("News"));
    }

    #[test]
    fn test_height() {
        assert_eq!(Dashboard::height(true, true), 4);
        assert_eq!(Dashboard::height(false, false), 2);
    }
}
