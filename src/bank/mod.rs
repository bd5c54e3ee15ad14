//! # Banking
//!
//! A small multi-user bank kept in one SQLite file. Every operation is a
//! thin wrapper over parameterized SQL; anything that touches more than one
//! row runs inside a single database transaction and rolls back on error.
//!
//! ## Modules
//!
//! - [`users`]: registration and login (salted SHA-256)
//! - [`accounts`]: accounts, deposits, withdrawals, transfers, history
//! - [`cards`], [`loans`], [`payments`] (money requests and bills),
//!   [`recurring`], [`chat`]
//! - [`cli`]: the `zelda bank` subcommands
//!
//! Money is always integer cents; see [`money`].

pub mod accounts;
pub mod cards;
pub mod chat;
pub mod cli;
pub mod error;
pub mod loans;
pub mod money;
pub mod payments;
pub mod recurring;
pub mod schema;
pub mod users;

use std::path::Path;

use rusqlite::Connection;

pub use accounts::{Account, AccountKind, LedgerEntry};
pub use cards::{Card, CardStatus};
pub use chat::ChatMessage;
pub use error::BankError;
pub use loans::{Loan, LoanStatus};
pub use payments::{Bill, MoneyRequest};
pub use recurring::{RecurringRun, RecurringTransfer};
pub use users::User;

/// Handle to the bank database. One per CLI invocation.
pub struct Bank {
    conn: Connection,
}

impl Bank {
    /// Open (creating if needed) the database at `path` and apply the schema.
    pub fn open(path: &Path) -> Result<Self, BankError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        log::info!("Opened bank database at {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, BankError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, BankError> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(schema::SCHEMA)?;
        Ok(Self { conn })
    }
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// `len` pseudo-random decimal digits drawn from a v4 UUID.
pub(crate) fn random_digits(len: usize) -> String {
    let value = uuid::Uuid::new_v4().as_u128();
    let digits = format!("{value:039}");
    digits[digits.len() - len.min(digits.len())..].to_string()
}
