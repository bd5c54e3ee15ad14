//! # Per-user Persistence
//!
//! Flat JSON files under `~/.zelda/users/<user>/`:
//!
//! ```text
//! users/<user>/
//! ├── layout.json     background + dashboard toggles
//! ├── notes.json      Vec<Note>
//! └── reminders.json  Vec<Reminder>
//! ```
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`). A missing
//! file loads as the default value.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::layout::Layout;
use crate::core::notes::{Note, Reminder};

const LAYOUT_FILE: &str = "layout.json";
const NOTES_FILE: &str = "notes.json";
const REMINDERS_FILE: &str = "reminders.json";

/// Returns `~/.zelda/`.
pub fn zelda_home() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".zelda"))
}

/// Keep user names usable as a single path component.
pub fn sanitize_user(user: &str) -> String {
    let cleaned: String = user
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "guest".to_string()
    } else {
        cleaned
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> io::Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// One user's storage directory.
#[derive(Debug, Clone)]
pub struct UserStore {
    dir: PathBuf,
}

impl UserStore {
    /// Store rooted at `root/users/<user>/`. The directory is created lazily on save.
    pub fn new(root: &Path, user: &str) -> Self {
        Self {
            dir: root.join("users").join(sanitize_user(user)),
        }
    }

    /// Store under `~/.zelda`, falling back to `./.zelda` without a home directory.
    pub fn for_user(user: &str) -> Self {
        let root = zelda_home().unwrap_or_else(|| {
            warn!("Could not determine home directory, storing user data in ./.zelda");
            PathBuf::from(".zelda")
        });
        Self::new(&root, user)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write<T: Serialize>(&self, file: &str, data: &T) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        atomic_write_json(&self.dir.join(file), data)?;
        debug!("Saved {}", self.dir.join(file).display());
        Ok(())
    }

    pub fn load_layout(&self) -> io::Result<Layout> {
        read_json_or_default(&self.dir.join(LAYOUT_FILE))
    }

    pub fn save_layout(&self, layout: &Layout) -> io::Result<()> {
        self.write(LAYOUT_FILE, layout)
    }

    pub fn load_notes(&self) -> io::Result<Vec<Note>> {
        read_json_or_default(&self.dir.join(NOTES_FILE))
    }

    pub fn save_notes(&self, notes: &[Note]) -> io::Result<()> {
        self.write(NOTES_FILE, &notes)
    }

    pub fn load_reminders(&self) -> io::Result<Vec<Reminder>> {
        let mut reminders: Vec<Reminder> = read_json_or_default(&self.dir.join(REMINDERS_FILE))?;
        reminders.sort_by_key(|r| r.due);
        Ok(reminders)
    }

    pub fn save_reminders(&self, reminders: &[Reminder]) -> io::Result<()> {
        self.write(REMINDERS_FILE, &reminders)
    }
}
