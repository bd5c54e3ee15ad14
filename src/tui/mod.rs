//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the desktop,
//! and translates keyboard events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Flow
//!
//! ```text
//! crossterm event → TuiEvent → screen panel → Action → update() → Effect
//!                                                                  ↓
//!            background task (feeds, timer, mail) → Action ← run_effect()
//! ```
//!
//! Background tasks run on the tokio runtime and report back through a
//! std `mpsc` channel drained once per loop iteration.
//!
//! ## Redraw Strategy
//!
//! Draws happen when an event or background action arrived, or when the
//! wall clock ticks into a new second (the dashboard clock shows seconds).
//! Otherwise the loop sleeps in `poll` for up to 250ms.

mod component;
mod components;
mod event;
mod theme;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, Screen};
use crate::core::storage::UserStore;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    BackgroundsPanel, CalculatorPanel, ChessPanel, FilesPanel, MailPanel, MazeControls,
    MenuState, NotesPanel, PomodoroControls,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub menu: MenuState,
    pub calculator: CalculatorPanel,
    pub files: FilesPanel,
    pub maze: MazeControls,
    pub chess: ChessPanel,
    pub mail: MailPanel,
    pub notes: NotesPanel,
    pub pomodoro: PomodoroControls,
    pub backgrounds: BackgroundsPanel,
}

impl TuiState {
    pub fn new(app: &App) -> Self {
        let mut backgrounds = BackgroundsPanel::default();
        backgrounds.select_current(app.layout.background);
        Self {
            menu: MenuState::default(),
            calculator: CalculatorPanel::default(),
            files: FilesPanel::default(),
            maze: MazeControls,
            chess: ChessPanel::default(),
            mail: MailPanel::default(),
            notes: NotesPanel::default(),
            pomodoro: PomodoroControls {
                running: app.pomodoro.running,
            },
            backgrounds,
        }
    }

    /// Route one terminal event to the current screen.
    pub fn handle_event(&mut self, app: &App, event: &TuiEvent) -> Option<Action> {
        if matches!(event, TuiEvent::ForceQuit) {
            return Some(Action::Quit);
        }
        let screen = app.current_screen();
        if matches!(event, TuiEvent::Escape) {
            return (screen != Screen::Menu).then_some(Action::Back);
        }

        // Sync props from App before handling
        self.pomodoro.running = app.pomodoro.running;
        self.notes
            .sync(app.notebook.notes.len(), app.notebook.reminders.len());

        match screen {
            Screen::Menu => self.menu.handle_event(event),
            Screen::FileBrowser => self.files.handle_event(event),
            Screen::Calculator => self.calculator.handle_event(event),
            Screen::Maze => self.maze.handle_event(event),
            Screen::Chess => self.chess.handle_event(event),
            Screen::Mail => self.mail.handle_event(event),
            Screen::Notes => self.notes.handle_event(event),
            Screen::Pomodoro => self.pomodoro.handle_event(event),
            Screen::Backgrounds => self.backgrounds.handle_event(event),
            Screen::SystemInfo | Screen::NanoEditor | Screen::WebBrowser => None,
        }
    }

    /// Clear a form once the reducer accepted what it submitted.
    fn after_update(&mut self, submitted: &Submitted, effect: &Effect) {
        match (submitted, effect) {
            (Submitted::Mail, Effect::SendMail(_)) => self.mail.clear(),
            (Submitted::Note, Effect::SaveNotes) => self.notes.note_input.clear(),
            (Submitted::Reminder, Effect::SaveReminders) => self.notes.reminder_input.clear(),
            _ => {}
        }
    }
}

/// Which form, if any, produced an action.
enum Submitted {
    Mail,
    Note,
    Reminder,
    Other,
}

impl Submitted {
    fn of(action: &Action) -> Self {
        match action {
            Action::SendMail { .. } => Submitted::Mail,
            Action::AddNote(_) => Submitted::Note,
            Action::AddReminder(_) => Submitted::Reminder,
            _ => Submitted::Other,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Harmlessly ignored by terminals without the kitty keyboard protocol
        execute!(
            stdout(),
            EnableBracketedPaste,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags, DisableBracketedPaste);
    }
}

/// Handles for background work that can be cancelled.
#[derive(Default)]
struct Tasks {
    timer: Option<tokio::task::AbortHandle>,
}

impl Tasks {
    fn stop_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            debug!("Stopping pomodoro ticker");
            handle.abort();
        }
    }
}

/// Load the user's saved layout, notes and reminders. Missing files mean
/// defaults; unreadable ones are logged and skipped.
fn load_user_data(app: &mut App, store: &UserStore) {
    match store.load_layout() {
        Ok(layout) => app.layout = layout,
        Err(e) => warn!("Failed to load layout from {}: {}", store.dir().display(), e),
    }
    match store.load_notes() {
        Ok(notes) => app.notebook.notes = notes,
        Err(e) => warn!("Failed to load notes: {}", e),
    }
    match store.load_reminders() {
        Ok(reminders) => app.notebook.reminders = reminders,
        Err(e) => warn!("Failed to load reminders: {}", e),
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = App::from_config(&config);
    let store = UserStore::for_user(&app.user);
    load_user_data(&mut app, &store);
    let mut tui = TuiState::new(&app);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut tasks = Tasks::default();

    let refresh_every = Duration::from_secs(app.refresh_secs.max(1));
    let mut last_refresh = Instant::now();
    let mut should_quit = dispatch(
        &mut app,
        &mut tui,
        &store,
        &mut tasks,
        &tx,
        Action::RefreshFeeds,
    );

    let mut needs_redraw = true; // Force first frame
    let mut last_second = Local::now().timestamp();

    while !should_quit {
        let now = Local::now();
        if now.timestamp() != last_second {
            last_second = now.timestamp();
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, &now))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(POLL_INTERVAL);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            // Resize just needs a redraw (already flagged above)
            if matches!(event, TuiEvent::Resize) {
                continue;
            }
            if let Some(action) = tui.handle_event(&app, &event)
                && dispatch(&mut app, &mut tui, &store, &mut tasks, &tx, action)
            {
                should_quit = true;
                break;
            }
        }
        if should_quit {
            break;
        }

        // Handle background task actions (feeds, timer ticks, mail results)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if dispatch(&mut app, &mut tui, &store, &mut tasks, &tx, action) {
                should_quit = true;
                break;
            }
        }

        if last_refresh.elapsed() >= refresh_every {
            last_refresh = Instant::now();
            needs_redraw = true;
            should_quit |= dispatch(
                &mut app,
                &mut tui,
                &store,
                &mut tasks,
                &tx,
                Action::RefreshFeeds,
            );
        }
    }

    tasks.stop_timer();
    info!("Zelda TUI OS shutting down");
    ratatui::restore();
    Ok(())
}

/// Run one action through the reducer and carry out its effect.
/// Returns true when the app should exit.
fn dispatch(
    app: &mut App,
    tui: &mut TuiState,
    store: &UserStore,
    tasks: &mut Tasks,
    tx: &mpsc::Sender<Action>,
    action: Action,
) -> bool {
    let submitted = Submitted::of(&action);
    let effect = update(app, action);
    tui.after_update(&submitted, &effect);
    if matches!(app.current_screen(), Screen::Backgrounds) {
        tui.backgrounds.select_current(app.layout.background);
    }
    run_effect(effect, app, store, tasks, tx)
}

fn run_effect(
    effect: Effect,
    app: &mut App,
    store: &UserStore,
    tasks: &mut Tasks,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::FetchFeeds => spawn_feed_fetch(app, tx.clone()),
        Effect::StartTimer => {
            tasks.stop_timer();
            tasks.timer = Some(spawn_ticker(tx.clone()));
        }
        Effect::StopTimer => tasks.stop_timer(),
        Effect::SendMail(mail) => spawn_send_mail(app, mail, tx.clone()),
        Effect::SaveNotes => {
            if let Err(e) = store.save_notes(&app.notebook.notes) {
                warn!("Failed to save notes: {}", e);
                app.status_message = format!("Could not save notes: {e}");
            }
        }
        Effect::SaveReminders => {
            if let Err(e) = store.save_reminders(&app.notebook.reminders) {
                warn!("Failed to save reminders: {}", e);
                app.status_message = format!("Could not save reminders: {e}");
            }
        }
        Effect::SaveLayout => {
            if let Err(e) = store.save_layout(&app.layout) {
                warn!("Failed to save layout: {}", e);
                app.status_message = format!("Could not save layout: {e}");
            }
        }
    }
    false
}

fn spawn_feed_fetch(app: &App, tx: mpsc::Sender<Action>) {
    info!("Spawning feed refresh");
    let weather = app.weather.clone();
    let news = app.news.clone();
    let tx_news = tx.clone();

    tokio::spawn(async move {
        let line = weather.summary().await;
        if tx.send(Action::WeatherLoaded(line)).is_err() {
            warn!("Failed to send weather line: receiver dropped");
        }
    });
    tokio::spawn(async move {
        let line = news.summary().await;
        if tx_news.send(Action::NewsLoaded(line)).is_err() {
            warn!("Failed to send news line: receiver dropped");
        }
    });
}

/// One `PomodoroTick` per second until aborted.
fn spawn_ticker(tx: mpsc::Sender<Action>) -> tokio::task::AbortHandle {
    debug!("Starting pomodoro ticker");
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // First tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            if tx.send(Action::PomodoroTick).is_err() {
                break;
            }
        }
    });
    handle.abort_handle()
}

fn spawn_send_mail(app: &App, mail: crate::services::OutgoingMail, tx: mpsc::Sender<Action>) {
    info!("Sending mail to {}", mail.to);
    let transport = app.mail.transport.clone();
    tokio::spawn(async move {
        let outcome = transport.send(&mail).await;
        if let Err(e) = &outcome {
            warn!("Mail to {} failed: {}", mail.to, e);
        }
        if tx.send(Action::MailSent { mail, outcome }).is_err() {
            warn!("Failed to report mail result: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::Background;
    use crate::test_support::test_app;

    #[test]
    fn test_force_quit_from_any_screen() {
        let mut app = test_app();
        update(&mut app, Action::Open(Screen::Mail));
        let mut tui = TuiState::new(&app);
        assert!(matches!(tui.handle_event(&app, &TuiEvent::ForceQuit), Some(Action::Quit)));
    }

    #[test]
    fn test_escape_goes_back_except_on_menu() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        assert!(tui.handle_event(&app, &TuiEvent::Escape).is_none());
        update(&mut app, Action::Open(Screen::Maze));
        assert!(matches!(tui.handle_event(&app, &TuiEvent::Escape), Some(Action::Back)));
    }

    #[test]
    fn test_events_route_to_current_screen() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        update(&mut app, Action::Open(Screen::Maze));
        assert!(matches!(
            tui.handle_event(&app, &TuiEvent::CursorUp),
            Some(Action::MoveMaze(_))
        ));

        update(&mut app, Action::Open(Screen::Menu));
        assert!(tui.handle_event(&app, &TuiEvent::CursorUp).is_none());
        assert_eq!(tui.menu.selected, crate::core::state::MENU.len() - 1);

        update(&mut app, Action::Open(Screen::SystemInfo));
        assert!(tui.handle_event(&app, &TuiEvent::Submit).is_none());
    }

    #[test]
    fn test_pomodoro_prop_synced_before_event() {
        let mut app = test_app();
        update(&mut app, Action::Open(Screen::Pomodoro));
        let mut tui = TuiState::new(&app);
        update(&mut app, Action::PomodoroStart);
        assert!(matches!(
            tui.handle_event(&app, &TuiEvent::Submit),
            Some(Action::PomodoroStop)
        ));
    }

    #[test]
    fn test_accepted_mail_clears_form() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        for c in "link@hyrule.org".chars() {
            tui.mail.handle_event(&TuiEvent::InputChar(c));
        }
        let action = Action::SendMail {
            to: "link@hyrule.org".to_string(),
            subject: "Hi".to_string(),
            body: "Hello".to_string(),
        };
        let submitted = Submitted::of(&action);
        let effect = update(&mut app, action);
        assert!(matches!(effect, Effect::SendMail(_)));
        tui.after_update(&submitted, &effect);
        assert!(tui.mail.to.buffer.is_empty());
    }

    #[test]
    fn test_rejected_reminder_keeps_text() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        tui.notes.reminder_input.buffer = "tomorrow feed Epona".to_string();
        let action = Action::AddReminder("tomorrow feed Epona".to_string());
        let submitted = Submitted::of(&action);
        let effect = update(&mut app, action);
        assert_eq!(effect, Effect::None);
        tui.after_update(&submitted, &effect);
        assert_eq!(tui.notes.reminder_input.buffer, "tomorrow feed Epona");
    }

    #[test]
    fn test_new_state_points_at_saved_background() {
        let mut app = test_app();
        app.layout.background = Background::Ember;
        let tui = TuiState::new(&app);
        assert_eq!(tui.backgrounds.selected(), 3);
    }
}
