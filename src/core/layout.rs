//! Desktop layout: background theme and which dashboard feeds are shown.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    #[default]
    Classic,
    Forest,
    Ocean,
    Ember,
    Midnight,
}

impl Background {
    pub const ALL: [Background; 5] = [
        Background::Classic,
        Background::Forest,
        Background::Ocean,
        Background::Ember,
        Background::Midnight,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Background::Classic => "Classic",
            Background::Forest => "Forest",
            Background::Ocean => "Ocean",
            Background::Ember => "Ember",
            Background::Midnight => "Midnight",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Layout {
    #[serde(default)]
    pub background: Background,
    #[serde(default = "default_true")]
    pub show_weather: bool,
    #[serde(default = "default_true")]
    pub show_news: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            background: Background::default(),
            show_weather: true,
            show_news: true,
        }
    }
}
