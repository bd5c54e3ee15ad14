//! Money requests between users, and bills.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::accounts::{debit, first_account, move_funds, owned_account};
use super::money::{ensure_positive, format_cents};
use super::{Bank, BankError, User, now_rfc3339};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(input: &str) -> Result<NaiveDate, BankError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| BankError::InvalidInput(format!("'{}' is not a YYYY-MM-DD date", input.trim())))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyRequest {
    pub id: i64,
    pub requester: String,
    pub payer: String,
    pub amount_cents: i64,
    pub note: String,
    /// `pending`, `paid` or `declined`
    pub status: String,
    pub created_at: String,
}

impl MoneyRequest {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            requester: row.get("requester")?,
            payer: row.get("payer")?,
            amount_cents: row.get("amount_cents")?,
            note: row.get("note")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn display(&self) -> String {
        format!(
            "#{}  {} asks {} for {}  [{}]  {}",
            self.id,
            self.requester,
            self.payer,
            format_cents(self.amount_cents),
            self.status,
            self.note
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bill {
    pub id: i64,
    pub account_number: String,
    pub payee: String,
    pub amount_cents: i64,
    pub due_date: String,
    /// `unpaid` or `paid`
    pub status: String,
    pub paid_at: Option<String>,
}

impl Bill {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            account_number: row.get("account_number")?,
            payee: row.get("payee")?,
            amount_cents: row.get("amount_cents")?,
            due_date: row.get("due_date")?,
            status: row.get("status")?,
            paid_at: row.get("paid_at")?,
        })
    }

    pub fn display(&self) -> String {
        format!(
            "#{}  {}  {}  due {}  [{}]  from {}",
            self.id,
            self.payee,
            format_cents(self.amount_cents),
            self.due_date,
            self.status,
            self.account_number
        )
    }
}

const REQUEST_SELECT: &str = "SELECT r.id, req.username AS requester, pay.username AS payer,
            r.amount_cents, r.note, r.status, r.created_at, r.requester_id, r.payer_id
     FROM money_requests r
     JOIN users req ON req.id = r.requester_id
     JOIN users pay ON pay.id = r.payer_id";

const BILL_SELECT: &str = "SELECT b.id, a.account_number, b.payee, b.amount_cents, b.due_date,
            b.status, b.paid_at
     FROM bills b JOIN accounts a ON a.id = b.account_id";

/// A pending request addressed to `payer_id`, plus the requester's id.
fn pending_request_for(conn: &Connection, payer_id: i64, request_id: i64) -> Result<(MoneyRequest, i64), BankError> {
    let (request, requester_id) = conn
        .query_row(
            &format!("{REQUEST_SELECT} WHERE r.id = ?1 AND r.payer_id = ?2"),
            params![request_id, payer_id],
            |row| Ok((MoneyRequest::from_row(row)?, row.get::<_, i64>("requester_id")?)),
        )
        .optional()?
        .ok_or_else(|| BankError::NotFound(format!("request #{request_id}")))?;
    if request.status != "pending" {
        return Err(BankError::InvalidState(format!(
            "request #{request_id} is already {}",
            request.status
        )));
    }
    Ok((request, requester_id))
}

impl Bank {
    pub fn request_money(
        &self,
        requester: &User,
        payer_username: &str,
        amount_cents: i64,
        note: &str,
    ) -> Result<MoneyRequest, BankError> {
        ensure_positive(amount_cents)?;
        let payer = self.user_by_username(payer_username)?;
        if payer.id == requester.id {
            return Err(BankError::InvalidInput("cannot request money from yourself".to_string()));
        }
        let created_at = now_rfc3339();
        self.conn.execute(
            "INSERT INTO money_requests (requester_id, payer_id, amount_cents, note, status, created_at)
             VALUES (?1, ?2, ?3, ?4, 'pending', ?5)",
            params![requester.id, payer.id, amount_cents, note.trim(), created_at],
        )?;
        Ok(MoneyRequest {
            id: self.conn.last_insert_rowid(),
            requester: requester.username.clone(),
            payer: payer.username,
            amount_cents,
            note: note.trim().to_string(),
            status: "pending".to_string(),
            created_at,
        })
    }

    /// Pay a request addressed to `payer` into the requester's first account.
    pub fn pay_request(&mut self, payer: &User, request_id: i64, from_number: &str) -> Result<MoneyRequest, BankError> {
        let tx = self.conn.transaction()?;
        let (mut request, requester_id) = pending_request_for(&tx, payer.id, request_id)?;
        let from = owned_account(&tx, payer.id, from_number)?;
        let to = first_account(&tx, requester_id)?;
        move_funds(
            &tx,
            &from,
            &to,
            request.amount_cents,
            ("request_payment", "request_payment"),
            &format!("request #{request_id}"),
        )?;
        tx.execute(
            "UPDATE money_requests SET status = 'paid' WHERE id = ?1",
            params![request_id],
        )?;
        tx.commit()?;
        request.status = "paid".to_string();
        Ok(request)
    }

    pub fn decline_request(&self, payer: &User, request_id: i64) -> Result<MoneyRequest, BankError> {
        let (mut request, _) = pending_request_for(&self.conn, payer.id, request_id)?;
        self.conn.execute(
            "UPDATE money_requests SET status = 'declined' WHERE id = ?1",
            params![request_id],
        )?;
        request.status = "declined".to_string();
        Ok(request)
    }

    /// Requests sent or received by `user`, newest first.
    pub fn requests(&self, user: &User) -> Result<Vec<MoneyRequest>, BankError> {
        let mut stmt = self.conn.prepare(&format!(
            "{REQUEST_SELECT} WHERE r.requester_id = ?1 OR r.payer_id = ?1 ORDER BY r.id DESC"
        ))?;
        let rows = stmt.query_map(params![user.id], MoneyRequest::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn add_bill(
        &self,
        user: &User,
        account_number: &str,
        payee: &str,
        amount_cents: i64,
        due_date: &str,
    ) -> Result<Bill, BankError> {
        ensure_positive(amount_cents)?;
        let payee = payee.trim();
        if payee.is_empty() {
            return Err(BankError::InvalidInput("payee must not be empty".to_string()));
        }
        let due = parse_date(due_date)?.format(DATE_FORMAT).to_string();
        let account = owned_account(&self.conn, user.id, account_number)?;
        self.conn.execute(
            "INSERT INTO bills (account_id, payee, amount_cents, due_date, status)
             VALUES (?1, ?2, ?3, ?4, 'unpaid')",
            params![account.id, payee, amount_cents, due],
        )?;
        Ok(Bill {
            id: self.conn.last_insert_rowid(),
            account_number: account.number,
            payee: payee.to_string(),
            amount_cents,
            due_date: due,
            status: "unpaid".to_string(),
            paid_at: None,
        })
    }

    pub fn pay_bill(&mut self, user: &User, bill_id: i64) -> Result<Bill, BankError> {
        let tx = self.conn.transaction()?;
        let mut bill = tx
            .query_row(
                &format!("{BILL_SELECT} WHERE b.id = ?1 AND a.user_id = ?2"),
                params![bill_id, user.id],
                Bill::from_row,
            )
            .optional()?
            .ok_or_else(|| BankError::NotFound(format!("bill #{bill_id}")))?;
        if bill.status == "paid" {
            return Err(BankError::InvalidState(format!("bill #{bill_id} is already paid")));
        }
        let account = owned_account(&tx, user.id, &bill.account_number)?;
        debit(
            &tx,
            account.id,
            bill.amount_cents,
            "bill_payment",
            Some(&bill.payee),
            &format!("bill #{bill_id}"),
        )?;
        let paid_at = now_rfc3339();
        tx.execute(
            "UPDATE bills SET status = 'paid', paid_at = ?1 WHERE id = ?2",
            params![paid_at, bill_id],
        )?;
        tx.commit()?;
        bill.status = "paid".to_string();
        bill.paid_at = Some(paid_at);
        Ok(bill)
    }

    /// All of `user`'s bills, soonest due first.
    pub fn bills(&self, user: &User) -> Result<Vec<Bill>, BankError> {
        let mut stmt = self.conn.prepare(&format!(
            "{BILL_SELECT} WHERE a.user_id = ?1 ORDER BY b.due_date, b.id"
        ))?;
        let rows = stmt.query_map(params![user.id], Bill::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
