//! # Actions
//!
//! Everything that can happen on the desktop becomes an `Action`.
//! User presses Enter in the calculator? That's `Action::Calculate(expr)`.
//! The weather fetch returns? That's `Action::WeatherLoaded(line)`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing any I/O the TUI
//! loop must perform. Network, timer and persistence work always goes
//! through an `Effect`. The one exception is the file browser: opening it
//! and moving between directories reads the directory listing in place,
//! since the result has to be on screen in the same frame.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::layout::Background;
use crate::core::maze::{Direction, MoveOutcome};
use crate::core::pomodoro::TickOutcome;
use crate::core::state::{App, Screen};
use crate::services::{MailError, OutgoingMail};

#[derive(Debug)]
pub enum Action {
    // Navigation
    Open(Screen),
    Back,
    Quit,

    // Dashboard
    RefreshFeeds,
    WeatherLoaded(String),
    NewsLoaded(String),

    // Calculator
    Calculate(String),
    ClearCalculator,

    // Maze
    MoveMaze(Direction),
    ResetMaze,
    NextMaze,

    // Chess
    ChessMove(String),
    ResetChess,

    // Pomodoro
    PomodoroStart,
    PomodoroStop,
    PomodoroReset,
    PomodoroTick,

    // File browser
    FileSelectPrev,
    FileSelectNext,
    FileOpen,
    FileUp,
    FileRefresh,

    // Mail
    SendMail {
        to: String,
        subject: String,
        body: String,
    },
    MailSent {
        mail: OutgoingMail,
        outcome: Result<(), MailError>,
    },
    ClearSent,
    ClearInbox,

    // Notes & reminders
    AddNote(String),
    AddReminder(String),
    DeleteNote(usize),
    DeleteReminder(usize),

    // Layout
    SelectBackground(Background),
    ToggleWeather,
    ToggleNews,
}

/// I/O the TUI loop performs after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    FetchFeeds,
    StartTimer,
    StopTimer,
    SendMail(OutgoingMail),
    SaveNotes,
    SaveReminders,
    SaveLayout,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Open(screen) => open(app, screen),
        Action::Back => back(app),
        Action::Quit => Effect::Quit,

        Action::RefreshFeeds => {
            if app.is_fetching() {
                return Effect::None;
            }
            app.pending_feeds = 2;
            app.status_message = "Refreshing weather and news...".to_string();
            Effect::FetchFeeds
        }
        Action::WeatherLoaded(line) => {
            app.weather_line = line;
            feed_done(app);
            Effect::None
        }
        Action::NewsLoaded(line) => {
            app.news_line = line;
            feed_done(app);
            Effect::None
        }

        Action::Calculate(expression) => {
            app.status_message = app.calculator.submit(&expression);
            Effect::None
        }
        Action::ClearCalculator => {
            app.calculator.clear();
            app.status_message = "Calculator history cleared.".to_string();
            Effect::None
        }

        Action::MoveMaze(direction) => {
            app.status_message = match app.maze.try_move(direction) {
                MoveOutcome::Moved => format!("Moves: {}", app.maze.moves),
                MoveOutcome::Blocked if app.maze.escaped => {
                    "Already out! Press r to replay or n for the next maze.".to_string()
                }
                MoveOutcome::Blocked => "Bonk! That's a wall.".to_string(),
                MoveOutcome::Escaped => {
                    format!("You escaped in {} moves!", app.maze.moves)
                }
            };
            Effect::None
        }
        Action::ResetMaze => {
            app.maze.reset();
            app.status_message = "Maze reset.".to_string();
            Effect::None
        }
        Action::NextMaze => {
            app.maze = app.maze.next_level();
            app.status_message = format!("Maze {}", app.maze.level + 1);
            Effect::None
        }

        Action::ChessMove(mv) => {
            let mv = mv.trim().to_string();
            if mv.is_empty() {
                return Effect::None;
            }
            let reply = app.chess.make_move(&mv);
            app.chess_log.push(reply.clone());
            app.status_message = reply;
            Effect::None
        }
        Action::ResetChess => {
            app.chess = crate::core::chess::ChessBoard::new();
            app.chess_log.clear();
            app.status_message = app.chess.status();
            Effect::None
        }

        Action::PomodoroStart => {
            if app.pomodoro.start() {
                app.status_message = "Pomodoro started.".to_string();
                Effect::StartTimer
            } else {
                Effect::None
            }
        }
        Action::PomodoroStop => {
            app.pomodoro.stop();
            app.status_message = "Pomodoro paused.".to_string();
            Effect::StopTimer
        }
        Action::PomodoroReset => {
            app.pomodoro.reset();
            app.status_message = "Pomodoro reset.".to_string();
            Effect::StopTimer
        }
        Action::PomodoroTick => match app.pomodoro.tick() {
            TickOutcome::Finished => {
                app.status_message = "Pomodoro complete! Take a break.".to_string();
                Effect::StopTimer
            }
            TickOutcome::Counting | TickOutcome::Idle => Effect::None,
        },

        Action::FileSelectPrev => {
            app.files.select_prev();
            Effect::None
        }
        Action::FileSelectNext => {
            app.files.select_next();
            Effect::None
        }
        Action::FileOpen => {
            app.files.open_selected();
            Effect::None
        }
        Action::FileUp => {
            app.files.go_up();
            Effect::None
        }
        Action::FileRefresh => {
            app.files.refresh();
            Effect::None
        }

        Action::SendMail { to, subject, body } => {
            if app.mail_sending {
                app.status_message = "Still sending the previous message...".to_string();
                return Effect::None;
            }
            match app.mail.compose(&to, &subject, &body) {
                Ok(mail) => {
                    app.mail_sending = true;
                    app.status_message = format!("Sending to {}...", mail.to);
                    Effect::SendMail(mail)
                }
                Err(msg) => {
                    app.status_message = msg;
                    Effect::None
                }
            }
        }
        Action::MailSent { mail, outcome } => {
            app.mail_sending = false;
            app.status_message = app.mail.record_sent(mail, outcome);
            Effect::None
        }
        Action::ClearSent => {
            app.status_message = app.mail.clear_sent_items();
            Effect::None
        }
        Action::ClearInbox => {
            app.status_message = app.mail.clear_inbox();
            Effect::None
        }

        Action::AddNote(text) => match app.notebook.add_note(&text) {
            Ok(()) => {
                app.status_message = "Note saved.".to_string();
                Effect::SaveNotes
            }
            Err(e) => {
                app.status_message = e;
                Effect::None
            }
        },
        Action::AddReminder(text) => match app.notebook.add_reminder(&text) {
            Ok(()) => {
                app.status_message = "Reminder set.".to_string();
                Effect::SaveReminders
            }
            Err(e) => {
                app.status_message = e;
                Effect::None
            }
        },
        Action::DeleteNote(index) => {
            if app.notebook.remove_note(index).is_some() {
                app.status_message = "Note deleted.".to_string();
                Effect::SaveNotes
            } else {
                Effect::None
            }
        }
        Action::DeleteReminder(index) => {
            if app.notebook.remove_reminder(index).is_some() {
                app.status_message = "Reminder deleted.".to_string();
                Effect::SaveReminders
            } else {
                Effect::None
            }
        }

        Action::SelectBackground(background) => {
            app.layout.background = background;
            app.status_message = format!("Background: {}", background.label());
            Effect::SaveLayout
        }
        Action::ToggleWeather => {
            app.layout.show_weather = !app.layout.show_weather;
            Effect::SaveLayout
        }
        Action::ToggleNews => {
            app.layout.show_news = !app.layout.show_news;
            Effect::SaveLayout
        }
    }
}

fn open(app: &mut App, screen: Screen) -> Effect {
    if screen == Screen::Menu {
        let leaving_pomodoro = app.screens.iter().skip(1).any(|s| *s == Screen::Pomodoro);
        app.screens.truncate(1);
        if leaving_pomodoro && app.pomodoro.running {
            app.pomodoro.stop();
            return Effect::StopTimer;
        }
        return Effect::None;
    }
    if app.current_screen() == screen {
        return Effect::None;
    }
    if screen == Screen::FileBrowser {
        app.files.refresh();
    }
    if screen == Screen::Chess {
        app.status_message = app.chess.status();
    }
    app.screens.push(screen);
    Effect::None
}

fn back(app: &mut App) -> Effect {
    if app.screens.len() <= 1 {
        return Effect::None;
    }
    let leaving = app.screens.pop();
    if leaving == Some(Screen::Pomodoro) && app.pomodoro.running {
        app.pomodoro.stop();
        return Effect::StopTimer;
    }
    Effect::None
}

fn feed_done(app: &mut App) {
    app.pending_feeds = app.pending_feeds.saturating_sub(1);
    if app.pending_feeds == 0 {
        app.status_message = "Dashboard updated.".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pomodoro::WORK_SECONDS;
    use crate::test_support::test_app;

    #[test]
    fn test_open_and_back() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Open(Screen::Calculator)), Effect::None);
        assert_eq!(app.current_screen(), Screen::Calculator);
        // Opening the same screen twice does not stack it
        update(&mut app, Action::Open(Screen::Calculator));
        assert_eq!(app.screens.len(), 2);
        update(&mut app, Action::Back);
        assert_eq!(app.current_screen(), Screen::Menu);
        // Back on the menu is a no-op
        update(&mut app, Action::Back);
        assert_eq!(app.screens, vec![Screen::Menu]);
    }

    #[test]
    fn test_open_menu_unwinds_stack() {
        let mut app = test_app();
        update(&mut app, Action::Open(Screen::Maze));
        update(&mut app, Action::Open(Screen::Chess));
        update(&mut app, Action::Open(Screen::Menu));
        assert_eq!(app.screens, vec![Screen::Menu]);
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }

    #[test]
    fn test_refresh_feeds_once_while_in_flight() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::RefreshFeeds), Effect::FetchFeeds);
        assert_eq!(update(&mut app, Action::RefreshFeeds), Effect::None);
        update(&mut app, Action::WeatherLoaded("sunny".to_string()));
        assert!(app.is_fetching());
        update(&mut app, Action::NewsLoaded("headline".to_string()));
        assert!(!app.is_fetching());
        assert_eq!(app.weather_line, "sunny");
        assert_eq!(app.news_line, "headline");
    }

    #[test]
    fn test_calculate_updates_status() {
        let mut app = test_app();
        update(&mut app, Action::Calculate("6 * 7".to_string()));
        assert!(app.status_message.contains("42"));
        assert_eq!(app.calculator.history.len(), 1);
    }

    #[test]
    fn test_maze_wall_message() {
        let mut app = test_app();
        // Level 0 start has a wall directly above
        update(&mut app, Action::MoveMaze(Direction::Up));
        assert!(app.status_message.contains("wall"));
        assert_eq!(app.maze.moves, 0);
    }

    #[test]
    fn test_chess_move_is_acknowledged_only() {
        let mut app = test_app();
        let before = app.chess.board;
        update(&mut app, Action::ChessMove("e2-e4".to_string()));
        assert_eq!(
            app.status_message,
            "Attempted move: e2-e4. (Move logic not fully implemented)"
        );
        assert_eq!(app.chess.board, before);
        assert_eq!(app.chess_log.len(), 1);
        // Blank input is ignored
        update(&mut app, Action::ChessMove("   ".to_string()));
        assert_eq!(app.chess_log.len(), 1);
    }

    #[test]
    fn test_pomodoro_lifecycle() {
        let mut app = test_app();
        update(&mut app, Action::Open(Screen::Pomodoro));
        assert_eq!(update(&mut app, Action::PomodoroStart), Effect::StartTimer);
        assert_eq!(update(&mut app, Action::PomodoroStart), Effect::None);
        update(&mut app, Action::PomodoroTick);
        assert_eq!(app.pomodoro.time_left, WORK_SECONDS - 1);
        assert_eq!(update(&mut app, Action::PomodoroStop), Effect::StopTimer);
        // Ticks after stopping are ignored
        update(&mut app, Action::PomodoroTick);
        assert_eq!(app.pomodoro.time_left, WORK_SECONDS - 1);
        assert_eq!(update(&mut app, Action::PomodoroReset), Effect::StopTimer);
        assert_eq!(app.pomodoro.time_left, WORK_SECONDS);
    }

    #[test]
    fn test_leaving_pomodoro_stops_timer() {
        let mut app = test_app();
        update(&mut app, Action::Open(Screen::Pomodoro));
        update(&mut app, Action::PomodoroStart);
        assert_eq!(update(&mut app, Action::Back), Effect::StopTimer);
        assert!(!app.pomodoro.running);
    }

    #[test]
    fn test_jumping_to_menu_stops_timer() {
        let mut app = test_app();
        update(&mut app, Action::Open(Screen::Pomodoro));
        update(&mut app, Action::PomodoroStart);
        assert_eq!(update(&mut app, Action::Open(Screen::Menu)), Effect::StopTimer);
        assert_eq!(app.screens, vec![Screen::Menu]);
        assert!(!app.pomodoro.running);

        // A paused timer needs no stop
        update(&mut app, Action::Open(Screen::Pomodoro));
        assert_eq!(update(&mut app, Action::Open(Screen::Menu)), Effect::None);
    }

    #[test]
    fn test_pomodoro_finish_stops_timer() {
        let mut app = test_app();
        app.pomodoro.time_left = 1;
        update(&mut app, Action::PomodoroStart);
        assert_eq!(update(&mut app, Action::PomodoroTick), Effect::StopTimer);
        assert!(app.status_message.contains("complete"));
    }

    #[test]
    fn test_send_mail_flow() {
        let mut app = test_app();
        let effect = update(
            &mut app,
            Action::SendMail {
                to: "you@example.com".to_string(),
                subject: "Hi".to_string(),
                body: "Hello".to_string(),
            },
        );
        let mail = match effect {
            Effect::SendMail(mail) => mail,
            other => panic!("expected SendMail, got {other:?}"),
        };
        assert!(app.mail_sending);

        // A second send while in flight is refused
        let second = update(
            &mut app,
            Action::SendMail {
                to: "x@example.com".to_string(),
                subject: String::new(),
                body: String::new(),
            },
        );
        assert_eq!(second, Effect::None);

        update(&mut app, Action::MailSent { mail, outcome: Ok(()) });
        assert!(!app.mail_sending);
        assert_eq!(app.status_message, "Message sent successfully!");
        assert_eq!(app.mail.sent.len(), 1);
    }

    #[test]
    fn test_failed_mail_not_recorded() {
        let mut app = test_app();
        let mail = app.mail.compose("you@example.com", "s", "b").unwrap();
        update(
            &mut app,
            Action::MailSent {
                mail,
                outcome: Err(MailError::Transport("connection refused".to_string())),
            },
        );
        assert!(app.status_message.starts_with("Failed to send message:"));
        assert!(app.mail.sent.is_empty());
    }

    #[test]
    fn test_notes_effects() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::AddNote("milk".to_string())), Effect::SaveNotes);
        assert_eq!(update(&mut app, Action::AddNote("  ".to_string())), Effect::None);
        assert_eq!(
            update(&mut app, Action::AddReminder("2026-10-17 09:00 call".to_string())),
            Effect::SaveReminders
        );
        assert_eq!(
            update(&mut app, Action::AddReminder("whenever".to_string())),
            Effect::None
        );
        assert_eq!(update(&mut app, Action::DeleteNote(0)), Effect::SaveNotes);
        assert_eq!(update(&mut app, Action::DeleteNote(0)), Effect::None);
        assert_eq!(update(&mut app, Action::DeleteReminder(0)), Effect::SaveReminders);
    }

    #[test]
    fn test_select_background_saves_layout() {
        let mut app = test_app();
        assert_eq!(
            update(&mut app, Action::SelectBackground(Background::Forest)),
            Effect::SaveLayout
        );
        assert_eq!(app.layout.background, Background::Forest);
        update(&mut app, Action::ToggleNews);
        assert!(!app.layout.show_news);
    }
}
