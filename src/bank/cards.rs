use chrono::Months;
use rusqlite::{OptionalExtension, Row, params};

use super::accounts::owned_account;
use super::{Bank, BankError, User, now_rfc3339, random_digits};

const CARD_NUMBER_LEN: usize = 16;
const CARD_VALIDITY_MONTHS: u32 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Active,
    Blocked,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Active => "active",
            CardStatus::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: i64,
    pub account_number: String,
    pub number: String,
    /// `MM/YY`
    pub expiry: String,
    pub status: CardStatus,
}

impl Card {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let status: String = row.get("status")?;
        Ok(Self {
            id: row.get("id")?,
            account_number: row.get("account_number")?,
            number: row.get("card_number")?,
            expiry: row.get("expiry")?,
            status: if status == "blocked" {
                CardStatus::Blocked
            } else {
                CardStatus::Active
            },
        })
    }

    /// Only the last four digits are ever printed.
    pub fn masked_number(&self) -> String {
        let tail = &self.number[self.number.len().saturating_sub(4)..];
        format!("**** **** **** {tail}")
    }

    pub fn display(&self) -> String {
        format!(
            "{}  exp {}  {}  (account {})",
            self.masked_number(),
            self.expiry,
            self.status.as_str(),
            self.account_number
        )
    }
}

const CARD_SELECT: &str = "SELECT c.id, a.account_number, c.card_number, c.expiry, c.status
     FROM cards c JOIN accounts a ON a.id = c.account_id";

fn expiry_from(today: chrono::NaiveDate) -> String {
    today
        .checked_add_months(Months::new(CARD_VALIDITY_MONTHS))
        .unwrap_or(today)
        .format("%m/%y")
        .to_string()
}

impl Bank {
    pub fn issue_card(&self, user: &User, account_number: &str) -> Result<Card, BankError> {
        let account = owned_account(&self.conn, user.id, account_number)?;
        let number = random_digits(CARD_NUMBER_LEN);
        let expiry = expiry_from(chrono::Utc::now().date_naive());
        self.conn.execute(
            "INSERT INTO cards (account_id, card_number, expiry, status, created_at)
             VALUES (?1, ?2, ?3, 'active', ?4)",
            params![account.id, number, expiry, now_rfc3339()],
        )?;
        log::info!("Issued card for account {}", account.number);
        Ok(Card {
            id: self.conn.last_insert_rowid(),
            account_number: account.number,
            number,
            expiry,
            status: CardStatus::Active,
        })
    }

    pub fn cards(&self, user: &User) -> Result<Vec<Card>, BankError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT} WHERE a.user_id = ?1 ORDER BY c.id"))?;
        let rows = stmt.query_map(params![user.id], Card::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn block_card(&self, user: &User, card_id: i64) -> Result<Card, BankError> {
        self.set_card_status(user, card_id, CardStatus::Blocked)
    }

    pub fn unblock_card(&self, user: &User, card_id: i64) -> Result<Card, BankError> {
        self.set_card_status(user, card_id, CardStatus::Active)
    }

    fn set_card_status(&self, user: &User, card_id: i64, status: CardStatus) -> Result<Card, BankError> {
        let mut card = self
            .conn
            .query_row(
                &format!("{CARD_SELECT} WHERE c.id = ?1 AND a.user_id = ?2"),
                params![card_id, user.id],
                Card::from_row,
            )
            .optional()?
            .ok_or_else(|| BankError::NotFound(format!("card #{card_id}")))?;
        if card.status == status {
            return Err(BankError::InvalidState(format!(
                "card #{card_id} is already {}",
                status.as_str()
            )));
        }
        self.conn.execute(
            "UPDATE cards SET status = ?1 WHERE id = ?2",
            params![status.as_str(), card_id],
        )?;
        card.status = status;
        Ok(card)
    }
}
