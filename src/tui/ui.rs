use chrono::{DateTime, TimeZone};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use crate::core::state::{App, Screen};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    BackgroundsView, CalculatorView, ChessView, Dashboard, FilesView, MailView, MazeView, Menu,
    NotesView, Placeholder, PomodoroView, SystemInfoView, TitleBar,
};
use crate::tui::theme::palette;

pub fn draw_ui<Tz: TimeZone>(frame: &mut Frame, app: &App, tui: &mut TuiState, now: &DateTime<Tz>)
where
    Tz::Offset: std::fmt::Display,
{
    use Constraint::{Length, Min};

    let palette = palette(app.layout.background);
    let show_weather = app.layout.show_weather;
    let show_news = app.layout.show_news;
    let dashboard_height = Dashboard::height(show_weather, show_news);

    let [title_area, dashboard_area, main_area, footer_area] =
        Layout::vertical([Length(1), Length(dashboard_height), Min(0), Length(1)]).areas(frame.area());

    // Paint the whole desktop first so gaps between widgets get the theme too
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let screen = app.current_screen();
    TitleBar::new(
        &app.user,
        screen.title(),
        &app.status_message,
        app.is_fetching(),
        palette,
    )
    .render(frame, title_area);

    let mut dashboard = Dashboard::new(now, palette);
    dashboard.weather = show_weather.then(|| app.weather_line.clone());
    dashboard.news = show_news.then(|| app.news_line.clone());
    dashboard.due_reminders = app.notebook.due_count(now.naive_local());
    dashboard.render(frame, dashboard_area);

    match screen {
        Screen::Menu => Menu::new(&mut tui.menu, palette).render(frame, main_area),
        Screen::FileBrowser => {
            FilesView::new(&mut tui.files, &app.files, palette).render(frame, main_area)
        }
        Screen::Calculator => {
            CalculatorView::new(&mut tui.calculator, &app.calculator, palette).render(frame, main_area)
        }
        Screen::SystemInfo => SystemInfoView::new(&app.sysinfo, palette).render(frame, main_area),
        Screen::Maze => MazeView::new(&app.maze, palette).render(frame, main_area),
        Screen::Chess => ChessView::new(&mut tui.chess, &app.chess, &app.chess_log, palette)
            .render(frame, main_area),
        Screen::Mail => MailView::new(&mut tui.mail, &app.mail, app.mail_sending, palette)
            .render(frame, main_area),
        Screen::Notes => NotesView::new(&mut tui.notes, &app.notebook, now.naive_local(), palette)
            .render(frame, main_area),
        Screen::Pomodoro => PomodoroView::new(&app.pomodoro, palette).render(frame, main_area),
        Screen::Backgrounds => BackgroundsView::new(&mut tui.backgrounds, &app.layout, palette)
            .render(frame, main_area),
        Screen::NanoEditor | Screen::WebBrowser => Placeholder {
            title: screen.title(),
            text: screen.placeholder_text().unwrap_or("Coming soon!"),
            palette,
        }
        .render(frame, main_area),
    }

    let footer = if screen == Screen::Menu {
        " Ctrl+C Quit"
    } else {
        " Esc Back  Ctrl+C Quit"
    };
    frame.render_widget(
        Paragraph::new(Line::styled(footer, palette.hint())).style(palette.base()),
        footer_area,
    );
}
