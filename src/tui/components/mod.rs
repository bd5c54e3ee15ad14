//! # TUI Components
//!
//! One file per screen plus the shared chrome (title bar, dashboard, input
//! field).
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display-only widgets that receive everything as fields:
//! - `TitleBar`: product name, user, current screen, status
//! - `Dashboard`: clock, weather and news lines
//! - `Placeholder`: "coming soon" screens
//!
//! ### Stateful Components (Event-Driven)
//!
//! Each interactive screen is split in two:
//! - a persistent panel (`MenuState`, `MailPanel`, `NotesPanel`, ...) that
//!   lives in `TuiState`, implements `EventHandler<Event = Action>` and turns
//!   key presses into `Action`s for the reducer;
//! - a transient view (`Menu`, `MailView`, `NotesView`, ...) built per frame
//!   that borrows the panel plus the `App` data it shows.
//!
//! Panels never touch `App` directly. Anything they need from it (list
//! lengths, whether the timer runs) is copied in as a prop before the event
//! is handled.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs          (this file)
//! ├── title_bar.rs    (top status line)
//! ├── dashboard.rs    (clock, weather, news)
//! ├── input_box/      (single-line text field)
//! ├── menu.rs         (main menu)
//! ├── calculator.rs
//! ├── files.rs
//! ├── system_info.rs
//! ├── maze.rs
//! ├── chess.rs
//! ├── mail.rs
//! ├── notes.rs
//! ├── pomodoro.rs
//! ├── backgrounds.rs
//! └── placeholder.rs  (nano editor, web browser)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod backgrounds;
pub mod calculator;
pub mod chess;
pub mod dashboard;
pub mod files;
pub mod input_box;
pub mod mail;
pub mod maze;
pub mod menu;
pub mod notes;
pub mod placeholder;
pub mod pomodoro;
pub mod system_info;

pub use backgrounds::{BackgroundsPanel, BackgroundsView};
pub use calculator::{CalculatorPanel, CalculatorView};
pub use chess::{ChessPanel, ChessView};
pub use dashboard::Dashboard;
pub use files::{FilesPanel, FilesView};
pub use mail::{MailPanel, MailView};
pub use maze::{MazeControls, MazeView};
pub use menu::{Menu, MenuState};
pub use notes::{NotesPanel, NotesView};
pub use placeholder::Placeholder;
pub use pomodoro::{PomodoroControls, PomodoroView};
pub use system_info::SystemInfoView;
