//! # Notes & Reminders Screen
//!
//! Two input fields and two lists. Tab cycles focus; on a list, arrows move
//! the selection and `d` or Delete removes the selected entry. Inputs keep
//! their text until the owner confirms the entry was stored, so a typo in a
//! reminder time does not throw the line away.

use chrono::NaiveDateTime;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState};

use crate::core::action::Action;
use crate::core::notes::Notebook;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::input_box::InputBox;
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesFocus {
    NoteInput,
    ReminderInput,
    Notes,
    Reminders,
}

impl NotesFocus {
    fn next(self) -> Self {
        match self {
            NotesFocus::NoteInput => NotesFocus::ReminderInput,
            NotesFocus::ReminderInput => NotesFocus::Notes,
            NotesFocus::Notes => NotesFocus::Reminders,
            NotesFocus::Reminders => NotesFocus::NoteInput,
        }
    }

    fn prev(self) -> Self {
        match self {
            NotesFocus::NoteInput => NotesFocus::Reminders,
            NotesFocus::ReminderInput => NotesFocus::NoteInput,
            NotesFocus::Notes => NotesFocus::ReminderInput,
            NotesFocus::Reminders => NotesFocus::Notes,
        }
    }
}

pub struct NotesPanel {
    pub note_input: InputBox,
    pub reminder_input: InputBox,
    pub focus: NotesFocus,
    /// Prop: number of notes in the notebook
    pub note_count: usize,
    /// Prop: number of reminders in the notebook
    pub reminder_count: usize,
    notes_state: ListState,
    reminders_state: ListState,
}

impl Default for NotesPanel {
    fn default() -> Self {
        let mut panel = Self {
            note_input: InputBox::new(" New note "),
            reminder_input: InputBox::new(" New reminder (YYYY-MM-DD HH:MM text) "),
            focus: NotesFocus::NoteInput,
            note_count: 0,
            reminder_count: 0,
            notes_state: ListState::default(),
            reminders_state: ListState::default(),
        };
        panel.set_focus(NotesFocus::NoteInput);
        panel
    }
}

fn step(state: &mut ListState, len: usize, forward: bool) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0).min(len - 1);
    let next = if forward {
        (current + 1).min(len - 1)
    } else {
        current.saturating_sub(1)
    };
    state.select(Some(next));
}

fn clamp(state: &mut ListState, len: usize) {
    let selected = match (state.selected(), len) {
        (_, 0) => None,
        (None, _) => Some(0),
        (Some(i), len) => Some(i.min(len - 1)),
    };
    state.select(selected);
}

impl NotesPanel {
    fn set_focus(&mut self, focus: NotesFocus) {
        self.focus = focus;
        self.note_input.focused = focus == NotesFocus::NoteInput;
        self.reminder_input.focused = focus == NotesFocus::ReminderInput;
    }

    /// Keep list selections inside the current list lengths.
    pub fn sync(&mut self, note_count: usize, reminder_count: usize) {
        self.note_count = note_count;
        self.reminder_count = reminder_count;
        clamp(&mut self.notes_state, note_count);
        clamp(&mut self.reminders_state, reminder_count);
    }

    pub fn selected_note(&self) -> Option<usize> {
        self.notes_state.selected()
    }

    pub fn selected_reminder(&self) -> Option<usize> {
        self.reminders_state.selected()
    }
}

impl EventHandler for NotesPanel {
    type Event = Action;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Action> {
        match event {
            TuiEvent::FocusNext => {
                self.set_focus(self.focus.next());
                return None;
            }
            TuiEvent::FocusPrev => {
                self.set_focus(self.focus.prev());
                return None;
            }
            _ => {}
        }

        match self.focus {
            NotesFocus::NoteInput => {
                if matches!(event, TuiEvent::Submit) {
                    let text = self.note_input.buffer.trim().to_string();
                    return (!text.is_empty()).then_some(Action::AddNote(text));
                }
                self.note_input.handle_event(event);
                None
            }
            NotesFocus::ReminderInput => {
                if matches!(event, TuiEvent::Submit) {
                    let text = self.reminder_input.buffer.trim().to_string();
                    return (!text.is_empty()).then_some(Action::AddReminder(text));
                }
                self.reminder_input.handle_event(event);
                None
            }
            NotesFocus::Notes => match event {
                TuiEvent::CursorUp => {
                    step(&mut self.notes_state, self.note_count, false);
                    None
                }
                TuiEvent::CursorDown => {
                    step(&mut self.notes_state, self.note_count, true);
                    None
                }
                TuiEvent::InputChar('d') | TuiEvent::Delete => {
                    self.selected_note().map(Action::DeleteNote)
                }
                _ => None,
            },
            NotesFocus::Reminders => match event {
                TuiEvent::CursorUp => {
                    step(&mut self.reminders_state, self.reminder_count, false);
                    None
                }
                TuiEvent::CursorDown => {
                    step(&mut self.reminders_state, self.reminder_count, true);
                    None
                }
                TuiEvent::InputChar('d') | TuiEvent::Delete => {
                    self.selected_reminder().map(Action::DeleteReminder)
                }
                _ => None,
            },
        }
    }
}

pub struct NotesView<'a> {
    panel: &'a mut NotesPanel,
    notebook: &'a Notebook,
    now: NaiveDateTime,
    palette: Palette,
}

impl<'a> NotesView<'a> {
    pub fn new(
        panel: &'a mut NotesPanel,
        notebook: &'a Notebook,
        now: NaiveDateTime,
        palette: Palette,
    ) -> Self {
        Self {
            panel,
            notebook,
            now,
            palette,
        }
    }

    fn list_block(&self, title: String, focused: bool) -> Block<'static> {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.palette.border(focused))
            .title(title);
        if focused {
            block.title_bottom(Line::from(" ↑↓ Select  d Delete ").centered())
        } else {
            block
        }
    }
}

impl Component for NotesView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [inputs_area, lists_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
        let [note_input_area, reminder_input_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(inputs_area);
        let [notes_area, reminders_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(lists_area);

        self.panel.note_input.render_with(frame, note_input_area, &self.palette);
        self.panel
            .reminder_input
            .render_with(frame, reminder_input_area, &self.palette);

        // Notes wrap to the column width; each keeps a bullet on its first line
        let wrap_width = notes_area.width.saturating_sub(4).max(1) as usize;
        let notes: Vec<ListItem> = self
            .notebook
            .notes
            .iter()
            .map(|note| {
                let lines: Vec<Line> = textwrap::wrap(&note.text, wrap_width)
                    .into_iter()
                    .enumerate()
                    .map(|(i, part)| {
                        let prefix = if i == 0 { "• " } else { "  " };
                        Line::from(format!("{prefix}{part}"))
                    })
                    .collect();
                ListItem::new(lines)
            })
            .collect();
        let notes_focused = self.panel.focus == NotesFocus::Notes;
        let notes = List::new(notes)
            .block(self.list_block(format!(" Notes ({}) ", self.notebook.notes.len()), notes_focused))
            .style(self.palette.base())
            .highlight_style(if notes_focused {
                self.palette.highlight()
            } else {
                self.palette.base()
            });
        frame.render_stateful_widget(notes, notes_area, &mut self.panel.notes_state);

        let reminders: Vec<ListItem> = self
            .notebook
            .reminders
            .iter()
            .map(|reminder| {
                if reminder.is_due(self.now) {
                    ListItem::new(Line::styled(
                        format!("⏰ {}", reminder.display()),
                        self.palette.highlight(),
                    ))
                } else {
                    ListItem::new(format!("   {}", reminder.display()))
                }
            })
            .collect();
        let reminders_focused = self.panel.focus == NotesFocus::Reminders;
        let due = self.notebook.due_count(self.now);
        let reminders = List::new(reminders)
            .block(self.list_block(
                format!(" Reminders ({}, {} due) ", self.notebook.reminders.len(), due),
                reminders_focused,
            ))
            .style(self.palette.base())
            .highlight_symbol(if reminders_focused { "> " } else { "" });
        frame.render_stateful_widget(reminders, reminders_area, &mut self.panel.reminders_state);
    }
}
