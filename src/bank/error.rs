use std::fmt;

/// Errors from banking operations. The CLI prints these verbatim.
#[derive(Debug)]
pub enum BankError {
    /// Malformed user input (username, email, date, ...).
    InvalidInput(String),
    /// Zero, negative or unparsable amount.
    InvalidAmount(String),
    InsufficientFunds { balance_cents: i64, requested_cents: i64 },
    /// Unknown user or wrong password; deliberately indistinguishable.
    InvalidCredentials,
    /// Uniqueness violation (username, email, account or card number).
    Conflict(String),
    /// Missing row, or a row that belongs to someone else.
    NotFound(String),
    /// Operation not allowed in the row's current status.
    InvalidState(String),
    Database(rusqlite::Error),
    Io(std::io::Error),
}

impl fmt::Display for BankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            BankError::InvalidAmount(msg) => write!(f, "invalid amount: {msg}"),
            BankError::InsufficientFunds {
                balance_cents,
                requested_cents,
            } => write!(
                f,
                "insufficient funds: balance {}, requested {}",
                crate::bank::money::format_cents(*balance_cents),
                crate::bank::money::format_cents(*requested_cents)
            ),
            BankError::InvalidCredentials => write!(f, "invalid username or password"),
            BankError::Conflict(msg) => write!(f, "already exists: {msg}"),
            BankError::NotFound(msg) => write!(f, "not found: {msg}"),
            BankError::InvalidState(msg) => write!(f, "not allowed: {msg}"),
            BankError::Database(e) => write!(f, "database error: {e}"),
            BankError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for BankError {}

impl From<rusqlite::Error> for BankError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, msg) = &e
            && code.code == rusqlite::ErrorCode::ConstraintViolation
        {
            return BankError::Conflict(msg.clone().unwrap_or_else(|| "constraint violation".to_string()));
        }
        BankError::Database(e)
    }
}

impl From<std::io::Error> for BankError {
    fn from(e: std::io::Error) -> Self {
        BankError::Io(e)
    }
}
