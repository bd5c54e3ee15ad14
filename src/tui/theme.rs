//! Colours for each desktop background.

use ratatui::style::{Color, Modifier, Style};

use crate::core::layout::Background;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub accent: Color,
    pub muted: Color,
}

impl Palette {
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.background)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hint(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

pub fn palette(background: Background) -> Palette {
    match background {
        Background::Classic => Palette {
            background: Color::Black,
            text: Color::White,
            accent: Color::Green,
            muted: Color::DarkGray,
        },
        Background::Forest => Palette {
            background: Color::Rgb(16, 40, 24),
            text: Color::Rgb(220, 235, 210),
            accent: Color::Rgb(140, 200, 90),
            muted: Color::Rgb(90, 120, 90),
        },
        Background::Ocean => Palette {
            background: Color::Rgb(10, 30, 60),
            text: Color::Rgb(210, 230, 250),
            accent: Color::Cyan,
            muted: Color::Rgb(80, 110, 150),
        },
        Background::Ember => Palette {
            background: Color::Rgb(45, 15, 10),
            text: Color::Rgb(250, 225, 200),
            accent: Color::Rgb(255, 140, 60),
            muted: Color::Rgb(140, 90, 70),
        },
        Background::Midnight => Palette {
            background: Color::Rgb(12, 10, 30),
            text: Color::Rgb(200, 200, 230),
            accent: Color::Magenta,
            muted: Color::Rgb(90, 85, 130),
        },
    }
}
