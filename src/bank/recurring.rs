use chrono::{Days, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::accounts::{account_by_id, account_by_number, move_funds, owned_account};
use super::money::{ensure_positive, format_cents};
use super::payments::{DATE_FORMAT, parse_date};
use super::{Bank, BankError, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringTransfer {
    pub id: i64,
    pub from_account_number: String,
    pub to_account_number: String,
    pub amount_cents: i64,
    pub interval_days: i64,
    pub next_run: NaiveDate,
    pub active: bool,
}

impl RecurringTransfer {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let next_run: String = row.get("next_run")?;
        let next_run = NaiveDate::parse_from_str(&next_run, DATE_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Self {
            id: row.get("id")?,
            from_account_number: row.get("from_account_number")?,
            to_account_number: row.get("to_account_number")?,
            amount_cents: row.get("amount_cents")?,
            interval_days: row.get("interval_days")?,
            next_run,
            active: row.get("active")?,
        })
    }

    pub fn display(&self) -> String {
        format!(
            "#{}  {} -> {}  {} every {} day(s)  next {}  {}",
            self.id,
            self.from_account_number,
            self.to_account_number,
            format_cents(self.amount_cents),
            self.interval_days,
            self.next_run.format(DATE_FORMAT),
            if self.active { "active" } else { "cancelled" }
        )
    }
}

/// What one schedule did during [`Bank::run_due_transfers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringRun {
    pub schedule_id: i64,
    pub executed: u32,
    /// Set when a period failed; later periods were skipped for this run.
    pub error: Option<String>,
}

const RECURRING_SELECT: &str = "SELECT r.id, a.account_number AS from_account_number, r.to_account_number,
            r.amount_cents, r.interval_days, r.next_run, r.active, r.from_account_id
     FROM recurring_transfers r JOIN accounts a ON a.id = r.from_account_id";

fn advance(date: NaiveDate, interval_days: i64) -> Result<NaiveDate, BankError> {
    u64::try_from(interval_days)
        .ok()
        .and_then(|days| date.checked_add_days(Days::new(days)))
        .ok_or_else(|| BankError::InvalidInput(format!("cannot advance {date} by {interval_days} days")))
}

/// Execute one period of a schedule: move the money and push `next_run` forward.
fn run_once(conn: &Connection, schedule: &RecurringTransfer, from_account_id: i64) -> Result<NaiveDate, BankError> {
    let from = account_by_id(conn, from_account_id)?;
    let to = account_by_number(conn, &schedule.to_account_number)?;
    move_funds(
        conn,
        &from,
        &to,
        schedule.amount_cents,
        ("transfer_out", "transfer_in"),
        &format!("recurring #{}", schedule.id),
    )?;
    let next = advance(schedule.next_run, schedule.interval_days)?;
    conn.execute(
        "UPDATE recurring_transfers SET next_run = ?1 WHERE id = ?2",
        params![next.format(DATE_FORMAT).to_string(), schedule.id],
    )?;
    Ok(next)
}

impl Bank {
    pub fn schedule_transfer(
        &self,
        user: &User,
        from_number: &str,
        to_number: &str,
        amount_cents: i64,
        interval_days: i64,
        first_run: &str,
    ) -> Result<RecurringTransfer, BankError> {
        ensure_positive(amount_cents)?;
        if interval_days < 1 {
            return Err(BankError::InvalidInput("interval must be at least one day".to_string()));
        }
        let first_run = parse_date(first_run)?;
        let from = owned_account(&self.conn, user.id, from_number)?;
        let to = account_by_number(&self.conn, to_number)?;
        if from.id == to.id {
            return Err(BankError::InvalidInput(
                "cannot transfer to the same account".to_string(),
            ));
        }
        self.conn.execute(
            "INSERT INTO recurring_transfers
                 (from_account_id, to_account_number, amount_cents, interval_days, next_run, active)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)",
            params![
                from.id,
                to.number,
                amount_cents,
                interval_days,
                first_run.format(DATE_FORMAT).to_string()
            ],
        )?;
        Ok(RecurringTransfer {
            id: self.conn.last_insert_rowid(),
            from_account_number: from.number,
            to_account_number: to.number,
            amount_cents,
            interval_days,
            next_run: first_run,
            active: true,
        })
    }

    pub fn cancel_recurring(&self, user: &User, schedule_id: i64) -> Result<RecurringTransfer, BankError> {
        let mut schedule = self
            .conn
            .query_row(
                &format!("{RECURRING_SELECT} WHERE r.id = ?1 AND a.user_id = ?2"),
                params![schedule_id, user.id],
                RecurringTransfer::from_row,
            )
            .optional()?
            .ok_or_else(|| BankError::NotFound(format!("recurring transfer #{schedule_id}")))?;
        if !schedule.active {
            return Err(BankError::InvalidState(format!(
                "recurring transfer #{schedule_id} is already cancelled"
            )));
        }
        self.conn.execute(
            "UPDATE recurring_transfers SET active = 0 WHERE id = ?1",
            params![schedule_id],
        )?;
        schedule.active = false;
        Ok(schedule)
    }

    pub fn recurring(&self, user: &User) -> Result<Vec<RecurringTransfer>, BankError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECURRING_SELECT} WHERE a.user_id = ?1 ORDER BY r.id"))?;
        let rows = stmt.query_map(params![user.id], RecurringTransfer::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Execute every active schedule due on or before `today`. Missed periods
    /// are caught up one interval at a time, each in its own transaction.
    /// A failing period is reported and the rest of that schedule waits for
    /// the next run.
    pub fn run_due_transfers(&mut self, today: NaiveDate) -> Result<Vec<RecurringRun>, BankError> {
        let due: Vec<(RecurringTransfer, i64)> = {
            let mut stmt = self.conn.prepare(&format!(
                "{RECURRING_SELECT} WHERE r.active = 1 AND r.next_run <= ?1 ORDER BY r.id"
            ))?;
            let rows = stmt.query_map(params![today.format(DATE_FORMAT).to_string()], |row| {
                Ok((RecurringTransfer::from_row(row)?, row.get::<_, i64>("from_account_id")?))
            })?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        let mut runs = Vec::with_capacity(due.len());
        for (mut schedule, from_account_id) in due {
            let mut run = RecurringRun {
                schedule_id: schedule.id,
                executed: 0,
                error: None,
            };
            while schedule.next_run <= today {
                let tx = self.conn.transaction()?;
                match run_once(&tx, &schedule, from_account_id) {
                    Ok(next) => {
                        tx.commit()?;
                        schedule.next_run = next;
                        run.executed += 1;
                    }
                    Err(e) => {
                        log::warn!("Recurring transfer #{} failed: {}", schedule.id, e);
                        run.error = Some(e.to_string());
                        break;
                    }
                }
            }
            runs.push(run);
        }
        Ok(runs)
    }
}
