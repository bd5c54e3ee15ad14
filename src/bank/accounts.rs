use std::fmt;

use rusqlite::{Connection, OptionalExtension, Row, params};

use super::money::{ensure_positive, format_cents};
use super::{Bank, BankError, User, now_rfc3339, random_digits};

const ACCOUNT_NUMBER_LEN: usize = 10;
const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Checking,
    Savings,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
        }
    }

    pub fn parse(s: &str) -> Result<Self, BankError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "checking" => Ok(AccountKind::Checking),
            "savings" => Ok(AccountKind::Savings),
            other => Err(BankError::InvalidInput(format!(
                "unknown account type '{other}' (use checking or savings)"
            ))),
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub number: String,
    pub kind: AccountKind,
    pub balance_cents: i64,
    pub created_at: String,
}

impl Account {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let kind: String = row.get("kind")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            number: row.get("account_number")?,
            // the CHECK constraint only admits the two known kinds
            kind: AccountKind::parse(&kind).unwrap_or(AccountKind::Checking),
            balance_cents: row.get("balance_cents")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn summary(&self) -> String {
        format!("{} ({}): {}", self.number, self.kind, format_cents(self.balance_cents))
    }
}

/// One row of the `transactions` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: i64,
    pub account_id: i64,
    pub kind: String,
    pub amount_cents: i64,
    pub counterparty: Option<String>,
    pub description: String,
    pub created_at: String,
}

impl LedgerEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            account_id: row.get("account_id")?,
            kind: row.get("kind")?,
            amount_cents: row.get("amount_cents")?,
            counterparty: row.get("counterparty")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn display(&self) -> String {
        let mut line = format!("{} {:<14} {:>12}", self.created_at, self.kind, format_cents(self.amount_cents));
        if let Some(counterparty) = &self.counterparty {
            line.push_str(&format!("  {counterparty}"));
        }
        if !self.description.is_empty() {
            line.push_str(&format!("  {}", self.description));
        }
        line
    }
}

const ACCOUNT_COLUMNS: &str = "id, user_id, account_number, kind, balance_cents, created_at";

// Free functions below take `&Connection` so they work both on the bank's
// connection and inside a `rusqlite::Transaction`.

pub(crate) fn insert_account(conn: &Connection, user_id: i64, kind: AccountKind) -> Result<Account, BankError> {
    let number = random_digits(ACCOUNT_NUMBER_LEN);
    let created_at = now_rfc3339();
    conn.execute(
        "INSERT INTO accounts (user_id, account_number, kind, balance_cents, created_at)
         VALUES (?1, ?2, ?3, 0, ?4)",
        params![user_id, number, kind.as_str(), created_at],
    )?;
    Ok(Account {
        id: conn.last_insert_rowid(),
        user_id,
        number,
        kind,
        balance_cents: 0,
        created_at,
    })
}

pub(crate) fn account_by_number(conn: &Connection, number: &str) -> Result<Account, BankError> {
    conn.query_row(
        &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_number = ?1"),
        params![number.trim()],
        Account::from_row,
    )
    .optional()?
    .ok_or_else(|| BankError::NotFound(format!("account {}", number.trim())))
}

pub(crate) fn account_by_id(conn: &Connection, id: i64) -> Result<Account, BankError> {
    conn.query_row(
        &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"),
        params![id],
        Account::from_row,
    )
    .optional()?
    .ok_or_else(|| BankError::NotFound(format!("account #{id}")))
}

/// The account, if it exists and belongs to `user_id`. Someone else's account
/// is reported exactly like a missing one.
pub(crate) fn owned_account(conn: &Connection, user_id: i64, number: &str) -> Result<Account, BankError> {
    let account = account_by_number(conn, number)?;
    if account.user_id != user_id {
        return Err(BankError::NotFound(format!("account {}", number.trim())));
    }
    Ok(account)
}

pub(crate) fn first_account(conn: &Connection, user_id: i64) -> Result<Account, BankError> {
    conn.query_row(
        &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_id = ?1 ORDER BY id LIMIT 1"),
        params![user_id],
        Account::from_row,
    )
    .optional()?
    .ok_or_else(|| BankError::NotFound(format!("any account for user #{user_id}")))
}

fn record(
    conn: &Connection,
    account_id: i64,
    kind: &str,
    amount_cents: i64,
    counterparty: Option<&str>,
    description: &str,
) -> Result<(), BankError> {
    conn.execute(
        "INSERT INTO transactions (account_id, kind, amount_cents, counterparty, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![account_id, kind, amount_cents, counterparty, description, now_rfc3339()],
    )?;
    Ok(())
}

pub(crate) fn credit(
    conn: &Connection,
    account_id: i64,
    amount_cents: i64,
    kind: &str,
    counterparty: Option<&str>,
    description: &str,
) -> Result<(), BankError> {
    ensure_positive(amount_cents)?;
    conn.execute(
        "UPDATE accounts SET balance_cents = balance_cents + ?1 WHERE id = ?2",
        params![amount_cents, account_id],
    )?;
    record(conn, account_id, kind, amount_cents, counterparty, description)
}

/// Reads the current balance first; an overdraft fails without touching the row.
pub(crate) fn debit(
    conn: &Connection,
    account_id: i64,
    amount_cents: i64,
    kind: &str,
    counterparty: Option<&str>,
    description: &str,
) -> Result<(), BankError> {
    ensure_positive(amount_cents)?;
    let balance_cents = account_by_id(conn, account_id)?.balance_cents;
    if amount_cents > balance_cents {
        return Err(BankError::InsufficientFunds {
            balance_cents,
            requested_cents: amount_cents,
        });
    }
    conn.execute(
        "UPDATE accounts SET balance_cents = balance_cents - ?1 WHERE id = ?2",
        params![amount_cents, account_id],
    )?;
    record(conn, account_id, kind, amount_cents, counterparty, description)
}

/// Debit `from`, credit `to`, one ledger row on each side.
pub(crate) fn move_funds(
    conn: &Connection,
    from: &Account,
    to: &Account,
    amount_cents: i64,
    kinds: (&str, &str),
    description: &str,
) -> Result<(), BankError> {
    if from.id == to.id {
        return Err(BankError::InvalidInput(
            "cannot transfer to the same account".to_string(),
        ));
    }
    debit(conn, from.id, amount_cents, kinds.0, Some(&to.number), description)?;
    credit(conn, to.id, amount_cents, kinds.1, Some(&from.number), description)
}

impl Bank {
    pub fn open_account(&self, user: &User, kind: AccountKind) -> Result<Account, BankError> {
        let account = insert_account(&self.conn, user.id, kind)?;
        log::info!("Opened {} account {} for {}", kind, account.number, user.username);
        Ok(account)
    }

    pub fn accounts(&self, user: &User) -> Result<Vec<Account>, BankError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_id = ?1 ORDER BY id"))?;
        let rows = stmt.query_map(params![user.id], Account::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// One of `user`'s accounts by number.
    pub fn account(&self, user: &User, number: &str) -> Result<Account, BankError> {
        owned_account(&self.conn, user.id, number)
    }

    /// Any account by number, regardless of owner.
    pub fn account_by_number(&self, number: &str) -> Result<Account, BankError> {
        account_by_number(&self.conn, number)
    }

    pub fn deposit(&mut self, user: &User, number: &str, amount_cents: i64) -> Result<Account, BankError> {
        ensure_positive(amount_cents)?;
        let tx = self.conn.transaction()?;
        let account = owned_account(&tx, user.id, number)?;
        credit(&tx, account.id, amount_cents, "deposit", None, "")?;
        let account = account_by_id(&tx, account.id)?;
        tx.commit()?;
        Ok(account)
    }

    pub fn withdraw(&mut self, user: &User, number: &str, amount_cents: i64) -> Result<Account, BankError> {
        ensure_positive(amount_cents)?;
        let tx = self.conn.transaction()?;
        let account = owned_account(&tx, user.id, number)?;
        debit(&tx, account.id, amount_cents, "withdrawal", None, "")?;
        let account = account_by_id(&tx, account.id)?;
        tx.commit()?;
        Ok(account)
    }

    /// Move money from one of `user`'s accounts to any account. Returns the
    /// source account after the transfer.
    pub fn transfer(
        &mut self,
        user: &User,
        from_number: &str,
        to_number: &str,
        amount_cents: i64,
    ) -> Result<Account, BankError> {
        ensure_positive(amount_cents)?;
        let tx = self.conn.transaction()?;
        let from = owned_account(&tx, user.id, from_number)?;
        let to = account_by_number(&tx, to_number)?;
        move_funds(&tx, &from, &to, amount_cents, ("transfer_out", "transfer_in"), "")?;
        let from = account_by_id(&tx, from.id)?;
        tx.commit()?;
        log::info!(
            "Transferred {} from {} to {}",
            format_cents(amount_cents),
            from.number,
            to.number
        );
        Ok(from)
    }

    /// Newest first. `limit` of `None` uses a default page size.
    pub fn history(&self, user: &User, number: &str, limit: Option<usize>) -> Result<Vec<LedgerEntry>, BankError> {
        let account = owned_account(&self.conn, user.id, number)?;
        let limit = i64::try_from(limit.unwrap_or(DEFAULT_HISTORY_LIMIT)).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(
            "SELECT id, account_id, kind, amount_cents, counterparty, description, created_at
             FROM transactions WHERE account_id = ?1 ORDER BY id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![account.id, limit], LedgerEntry::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Bank, User, Account) {
        let mut bank = Bank::open_in_memory().unwrap();
        let user = bank.register("alice", "alice@example.com", "password123").unwrap();
        let account = bank.accounts(&user).unwrap().remove(0);
        (bank, user, account)
    }

    #[test]
    fn test_deposit_increases_balance_by_amount() {
        let (mut bank, user, account) = setup();
        let after = bank.deposit(&user, &account.number, 1234).unwrap();
        assert_eq!(after.balance_cents, 1234);
        let after = bank.deposit(&user, &account.number, 66).unwrap();
        assert_eq!(after.balance_cents, 1300);
    }

    #[test]
    fn test_deposit_rejects_non_positive() {
        let (mut bank, user, account) = setup();
        for amount in [0, -100] {
            assert!(matches!(
                bank.deposit(&user, &account.number, amount),
                Err(BankError::InvalidAmount(_))
            ));
        }
        assert_eq!(bank.account(&user, &account.number).unwrap().balance_cents, 0);
        assert!(bank.history(&user, &account.number, None).unwrap().is_empty());
    }

    #[test]
    fn test_withdraw_overdraft_leaves_balance_unchanged() {
        let (mut bank, user, account) = setup();
        bank.deposit(&user, &account.number, 500).unwrap();

        let err = bank.withdraw(&user, &account.number, 501).unwrap_err();
        assert!(matches!(
            err,
            BankError::InsufficientFunds {
                balance_cents: 500,
                requested_cents: 501
            }
        ));
        assert_eq!(bank.account(&user, &account.number).unwrap().balance_cents, 500);

        let after = bank.withdraw(&user, &account.number, 500).unwrap();
        assert_eq!(after.balance_cents, 0);
    }

    #[test]
    fn test_transfer_conserves_money() {
        let (mut bank, alice, checking) = setup();
        let savings = bank.open_account(&alice, AccountKind::Savings).unwrap();
        let bob = bank.register("bob", "bob@example.com", "password123").unwrap();
        let bob_account = bank.accounts(&bob).unwrap().remove(0);
        bank.deposit(&alice, &checking.number, 10_000).unwrap();

        bank.transfer(&alice, &checking.number, &savings.number, 2_500).unwrap();
        bank.transfer(&alice, &checking.number, &bob_account.number, 1_000).unwrap();

        let checking = bank.account(&alice, &checking.number).unwrap();
        let savings = bank.account(&alice, &savings.number).unwrap();
        let bob_account = bank.account(&bob, &bob_account.number).unwrap();
        assert_eq!(checking.balance_cents, 6_500);
        assert_eq!(savings.balance_cents, 2_500);
        assert_eq!(bob_account.balance_cents, 1_000);
        assert_eq!(
            checking.balance_cents + savings.balance_cents + bob_account.balance_cents,
            10_000
        );

        let history = bank.history(&bob, &bob_account.number, None).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, "transfer_in");
        assert_eq!(history[0].counterparty.as_deref(), Some(checking.number.as_str()));
    }

    #[test]
    fn test_failed_transfer_changes_nothing() {
        let (mut bank, alice, checking) = setup();
        let savings = bank.open_account(&alice, AccountKind::Savings).unwrap();
        bank.deposit(&alice, &checking.number, 100).unwrap();

        assert!(matches!(
            bank.transfer(&alice, &checking.number, &savings.number, 101),
            Err(BankError::InsufficientFunds { .. })
        ));
        assert!(matches!(
            bank.transfer(&alice, &checking.number, &checking.number, 50),
            Err(BankError::InvalidInput(_))
        ));
        assert!(matches!(
            bank.transfer(&alice, &checking.number, "0000000000", 50),
            Err(BankError::NotFound(_))
        ));

        assert_eq!(bank.account(&alice, &checking.number).unwrap().balance_cents, 100);
        assert_eq!(bank.account(&alice, &savings.number).unwrap().balance_cents, 0);
        assert!(bank.history(&alice, &savings.number, None).unwrap().is_empty());
    }

    #[test]
    fn test_other_users_accounts_are_not_found() {
        let (mut bank, alice, checking) = setup();
        let mallory = bank.register("mallory", "mallory@example.com", "password123").unwrap();

        assert!(matches!(
            bank.deposit(&mallory, &checking.number, 100),
            Err(BankError::NotFound(_))
        ));
        assert!(matches!(
            bank.history(&mallory, &checking.number, None),
            Err(BankError::NotFound(_))
        ));
        assert_eq!(bank.account(&alice, &checking.number).unwrap().balance_cents, 0);
    }

    #[test]
    fn test_history_newest_first_with_limit() {
        let (mut bank, user, account) = setup();
        for amount in [100, 200, 300] {
            bank.deposit(&user, &account.number, amount).unwrap();
        }
        bank.withdraw(&user, &account.number, 50).unwrap();

        let history = bank.history(&user, &account.number, Some(2)).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, "withdrawal");
        assert_eq!(history[0].amount_cents, 50);
        assert_eq!(history[1].amount_cents, 300);
    }

    #[test]
    fn test_account_kind_parse() {
        assert_eq!(AccountKind::parse("Savings").unwrap(), AccountKind::Savings);
        assert!(matches!(AccountKind::parse("crypto"), Err(BankError::InvalidInput(_))));
    }
}
