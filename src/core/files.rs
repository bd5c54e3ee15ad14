//! # File Browser
//!
//! Directory listing with descend/ascend. Read errors keep the previous
//! listing so the screen never goes blank.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn label(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileBrowser {
    pub path: PathBuf,
    pub entries: Vec<DirEntry>,
    pub selected: usize,
    pub error: Option<String>,
}

/// Directories first, then files, each sorted by name.
pub fn read_listing(path: &Path) -> io::Result<Vec<DirEntry>> {
    let mut entries: Vec<DirEntry> = fs::read_dir(path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: entry.file_type().map(|t| t.is_dir()).unwrap_or(false),
        })
        .collect();
    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    Ok(entries)
}

impl FileBrowser {
    pub fn new(path: PathBuf) -> Self {
        let mut browser = Self {
            path: path.clone(),
            entries: Vec::new(),
            selected: 0,
            error: None,
        };
        browser.navigate(path);
        browser
    }

    /// Start in the process working directory.
    pub fn from_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(cwd)
    }

    pub fn navigate(&mut self, path: PathBuf) {
        match read_listing(&path) {
            Ok(entries) => {
                self.path = path;
                self.entries = entries;
                self.selected = 0;
                self.error = None;
            }
            Err(e) => {
                log::warn!("Failed to list {}: {}", path.display(), e);
                self.error = Some(format!("{}: {}", path.display(), e));
            }
        }
    }

    pub fn refresh(&mut self) {
        let path = self.path.clone();
        let selected = self.selected;
        self.navigate(path);
        self.selected = selected.min(self.entries.len().saturating_sub(1));
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1).min(self.entries.len() - 1);
        }
    }

    pub fn selected_entry(&self) -> Option<&DirEntry> {
        self.entries.get(self.selected)
    }

    /// Descend into the selected entry if it is a directory.
    pub fn open_selected(&mut self) {
        if let Some(entry) = self.selected_entry()
            && entry.is_dir
        {
            let target = self.path.join(&entry.name);
            self.navigate(target);
        }
    }

    pub fn go_up(&mut self) {
        if let Some(parent) = self.path.parent() {
            let parent = parent.to_path_buf();
            self.navigate(parent);
        }
    }
}
