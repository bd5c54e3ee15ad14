//! # Notes & Reminders
//!
//! Plain text notes plus timestamped reminders. Reminders are typed as
//! `YYYY-MM-DD HH:MM text` and kept sorted by due time.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const REMINDER_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Note {
    pub id: String,
    pub text: String,
    pub created_at: i64,
}

impl Note {
    pub fn new(text: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.trim().to_string(),
            created_at: Local::now().timestamp(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Reminder {
    pub id: String,
    pub text: String,
    pub due: NaiveDateTime,
}

impl Reminder {
    /// Parse `YYYY-MM-DD HH:MM text`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        // Date and time are the first 16 characters
        let (stamp, text) = match (input.get(..16), input.get(16..)) {
            (Some(stamp), Some(text)) => (stamp, text.trim()),
            _ => return Err(format!("expected '{}' followed by text", "YYYY-MM-DD HH:MM")),
        };
        let due = NaiveDateTime::parse_from_str(stamp, REMINDER_FORMAT)
            .map_err(|e| format!("bad reminder time '{stamp}': {e}"))?;
        if text.is_empty() {
            return Err("reminder text is empty".to_string());
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            due,
        })
    }

    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.due <= now
    }

    pub fn display(&self) -> String {
        format!("{} {}", self.due.format(REMINDER_FORMAT), self.text)
    }
}

/// Both lists in one place; the reducer owns this through `App`.
#[derive(Debug, Default, Clone)]
pub struct Notebook {
    pub notes: Vec<Note>,
    pub reminders: Vec<Reminder>,
}

impl Notebook {
    pub fn add_note(&mut self, text: &str) -> Result<(), String> {
        if text.trim().is_empty() {
            return Err("note is empty".to_string());
        }
        self.notes.push(Note::new(text));
        Ok(())
    }

    pub fn add_reminder(&mut self, input: &str) -> Result<(), String> {
        let reminder = Reminder::parse(input)?;
        self.reminders.push(reminder);
        self.reminders.sort_by_key(|r| r.due);
        Ok(())
    }

    pub fn remove_note(&mut self, index: usize) -> Option<Note> {
        (index < self.notes.len()).then(|| self.notes.remove(index))
    }

    pub fn remove_reminder(&mut self, index: usize) -> Option<Reminder> {
        (index < self.reminders.len()).then(|| self.reminders.remove(index))
    }

    pub fn due_count(&self, now: NaiveDateTime) -> usize {
        self.reminders.iter().filter(|r| r.is_due(now)).count()
    }
}
