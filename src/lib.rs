//! Zelda TUI OS library exports for testing

pub mod bank;
pub mod core;
pub mod services;
pub mod tui;

#[cfg(test)]
pub mod test_support;
