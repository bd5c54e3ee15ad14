//! # Core Application Logic
//!
//! This module contains the desktop's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all desktop state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`config`]: `~/.zelda/config.toml` loading and env overrides
//! - [`storage`]: per-user JSON files (layout, notes, reminders)
//! - the remaining modules hold one screen's domain state each

pub mod action;
pub mod calculator;
pub mod chess;
pub mod clock;
pub mod config;
pub mod files;
pub mod layout;
pub mod maze;
pub mod notes;
pub mod pomodoro;
pub mod state;
pub mod storage;
pub mod sysinfo;
