//! # Application State
//!
//! Core state for the desktop. Domain logic only, no terminal types.
//! Presentation state (menu cursor, input buffers) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── screens: Vec<Screen>          // navigation stack, Menu at the bottom
//! ├── status_message: String        // status bar text
//! ├── user: String                  // selects ~/.zelda/users/<user>/
//! ├── layout: Layout                // background + dashboard toggles
//! ├── weather_line / news_line      // dashboard feed text
//! ├── weather / news: Arc<dyn FeedSource>
//! ├── pending_feeds: u8             // fetches still in flight
//! ├── calculator, maze, chess, pomodoro, files, sysinfo
//! ├── mail: MailService             // sent items, empty inbox
//! ├── mail_sending: bool
//! └── notebook: Notebook            // notes + reminders
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::calculator::Calculator;
use crate::core::chess::ChessBoard;
use crate::core::config::ResolvedConfig;
use crate::core::files::FileBrowser;
use crate::core::layout::Layout;
use crate::core::maze::Maze;
use crate::core::notes::Notebook;
use crate::core::pomodoro::Pomodoro;
use crate::core::sysinfo::SystemInfo;
use crate::services::mail::build_transport;
use crate::services::{FeedSource, MailService, NewsClient, WeatherClient};

/// One full-terminal view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    FileBrowser,
    Calculator,
    SystemInfo,
    Maze,
    Chess,
    Mail,
    Notes,
    NanoEditor,
    WebBrowser,
    Pomodoro,
    Backgrounds,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Menu => "Main Menu",
            Screen::FileBrowser => "File Browser",
            Screen::Calculator => "Calculator",
            Screen::SystemInfo => "System Info",
            Screen::Maze => "Maze Game",
            Screen::Chess => "Chess",
            Screen::Mail => "Mail",
            Screen::Notes => "Notes & Reminders",
            Screen::NanoEditor => "Nano Editor",
            Screen::WebBrowser => "Web Browser",
            Screen::Pomodoro => "Pomodoro Timer",
            Screen::Backgrounds => "Backgrounds",
        }
    }

    /// Text for screens that are still stubs.
    pub fn placeholder_text(self) -> Option<&'static str> {
        match self {
            Screen::NanoEditor => Some("Nano-like editor coming soon!"),
            Screen::WebBrowser => Some("TUI Web browser coming soon!"),
            _ => None,
        }
    }
}

/// A main menu button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Open(Screen),
    Exit,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Open(screen) => screen.title(),
            MenuItem::Exit => "Exit",
        }
    }
}

pub const MENU: &[MenuItem] = &[
    MenuItem::Open(Screen::FileBrowser),
    MenuItem::Open(Screen::Calculator),
    MenuItem::Open(Screen::SystemInfo),
    MenuItem::Open(Screen::Maze),
    MenuItem::Open(Screen::Chess),
    MenuItem::Open(Screen::Mail),
    MenuItem::Open(Screen::Notes),
    MenuItem::Open(Screen::NanoEditor),
    MenuItem::Open(Screen::WebBrowser),
    MenuItem::Open(Screen::Pomodoro),
    MenuItem::Open(Screen::Backgrounds),
    MenuItem::Exit,
];

pub struct App {
    pub screens: Vec<Screen>,
    pub status_message: String,
    pub user: String,
    pub layout: Layout,
    pub weather_line: String,
    pub news_line: String,
    pub weather: Arc<dyn FeedSource>,
    pub news: Arc<dyn FeedSource>,
    pub pending_feeds: u8,
    pub refresh_secs: u64,
    pub calculator: Calculator,
    pub maze: Maze,
    pub chess: ChessBoard,
    /// Move attempts and their acknowledgements, newest last.
    pub chess_log: Vec<String>,
    pub pomodoro: Pomodoro,
    pub files: FileBrowser,
    pub sysinfo: SystemInfo,
    pub mail: MailService,
    pub mail_sending: bool,
    pub notebook: Notebook,
}

impl App {
    pub fn new(
        user: String,
        weather: Arc<dyn FeedSource>,
        news: Arc<dyn FeedSource>,
        mail: MailService,
    ) -> Self {
        let weather_line = format!("{} (loading...)", weather.fallback());
        let news_line = format!("{} (loading...)", news.fallback());
        Self {
            screens: vec![Screen::Menu],
            status_message: format!("Welcome to Zelda TUI OS, {user}!"),
            user,
            layout: Layout::default(),
            weather_line,
            news_line,
            weather,
            news,
            pending_feeds: 0,
            refresh_secs: crate::core::config::DEFAULT_REFRESH_SECS,
            calculator: Calculator::new(),
            maze: Maze::default(),
            chess: ChessBoard::new(),
            chess_log: Vec::new(),
            pomodoro: Pomodoro::new(),
            files: FileBrowser::from_cwd(),
            sysinfo: SystemInfo::collect(),
            mail,
            mail_sending: false,
            notebook: Notebook::default(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let weather: Arc<dyn FeedSource> = Arc::new(WeatherClient::from_config(&config.weather));
        let news: Arc<dyn FeedSource> = Arc::new(NewsClient::from_config(&config.news));
        let sender = config
            .mail
            .as_ref()
            .map(|m| m.sender_email.clone())
            .unwrap_or_else(|| format!("{}@localhost", config.user));
        let mail = MailService::new(build_transport(config.mail.as_ref()), sender);

        let mut app = Self::new(config.user.clone(), weather, news, mail);
        app.refresh_secs = config.refresh_secs;
        app
    }

    pub fn current_screen(&self) -> Screen {
        self.screens.last().copied().unwrap_or(Screen::Menu)
    }

    pub fn is_fetching(&self) -> bool {
        self.pending_feeds > 0
    }
}
