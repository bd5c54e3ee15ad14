//! Table definitions. Applied on every open; every statement is idempotent.

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    salt          TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS accounts (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id        INTEGER NOT NULL REFERENCES users(id),
    account_number TEXT NOT NULL UNIQUE,
    kind           TEXT NOT NULL CHECK (kind IN ('checking', 'savings')),
    balance_cents  INTEGER NOT NULL DEFAULT 0 CHECK (balance_cents >= 0),
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id   INTEGER NOT NULL REFERENCES accounts(id),
    kind         TEXT NOT NULL,
    amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
    counterparty TEXT,
    description  TEXT NOT NULL DEFAULT '',
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account_id, id);

CREATE TABLE IF NOT EXISTS cards (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id  INTEGER NOT NULL REFERENCES accounts(id),
    card_number TEXT NOT NULL UNIQUE,
    expiry      TEXT NOT NULL,
    status      TEXT NOT NULL CHECK (status IN ('active', 'blocked')),
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS loans (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id           INTEGER NOT NULL REFERENCES users(id),
    account_id        INTEGER NOT NULL REFERENCES accounts(id),
    principal_cents   INTEGER NOT NULL CHECK (principal_cents > 0),
    rate_bps          INTEGER NOT NULL CHECK (rate_bps >= 0),
    term_months       INTEGER NOT NULL CHECK (term_months > 0),
    outstanding_cents INTEGER NOT NULL CHECK (outstanding_cents >= 0),
    status            TEXT NOT NULL CHECK (status IN ('active', 'paid')),
    created_at        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS loan_payments (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    loan_id      INTEGER NOT NULL REFERENCES loans(id),
    amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
    paid_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS money_requests (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    requester_id INTEGER NOT NULL REFERENCES users(id),
    payer_id     INTEGER NOT NULL REFERENCES users(id),
    amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
    note         TEXT NOT NULL DEFAULT '',
    status       TEXT NOT NULL CHECK (status IN ('pending', 'paid', 'declined')),
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS bills (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id   INTEGER NOT NULL REFERENCES accounts(id),
    payee        TEXT NOT NULL,
    amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
    due_date     TEXT NOT NULL,
    status       TEXT NOT NULL CHECK (status IN ('unpaid', 'paid')),
    paid_at      TEXT
);

CREATE TABLE IF NOT EXISTS recurring_transfers (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    from_account_id   INTEGER NOT NULL REFERENCES accounts(id),
    to_account_number TEXT NOT NULL,
    amount_cents      INTEGER NOT NULL CHECK (amount_cents > 0),
    interval_days     INTEGER NOT NULL CHECK (interval_days >= 1),
    next_run          TEXT NOT NULL,
    active            INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS chats (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL REFERENCES users(id),
    sender     TEXT NOT NULL CHECK (sender IN ('user', 'support')),
    message    TEXT NOT NULL,
    created_at TEXT NOT NULL
);
";
