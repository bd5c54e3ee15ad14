use rusqlite::{Connection, OptionalExtension, Row, params};

use super::accounts::{credit, debit, owned_account};
use super::money::{ensure_positive, format_cents};
use super::{Bank, BankError, User, now_rfc3339};

const MAX_RATE_BPS: i64 = 10_000;
const MAX_TERM_MONTHS: i64 = 360;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Active,
    Paid,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub id: i64,
    pub account_id: i64,
    pub principal_cents: i64,
    /// Annual rate in basis points (1/100 of a percent).
    pub rate_bps: i64,
    pub term_months: i64,
    pub outstanding_cents: i64,
    pub status: LoanStatus,
    pub created_at: String,
}

impl Loan {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let status: String = row.get("status")?;
        Ok(Self {
            id: row.get("id")?,
            account_id: row.get("account_id")?,
            principal_cents: row.get("principal_cents")?,
            rate_bps: row.get("rate_bps")?,
            term_months: row.get("term_months")?,
            outstanding_cents: row.get("outstanding_cents")?,
            status: if status == "paid" { LoanStatus::Paid } else { LoanStatus::Active },
            created_at: row.get("created_at")?,
        })
    }

    pub fn display(&self) -> String {
        format!(
            "#{}  principal {}  {}.{:02}% for {} months  outstanding {}  {}",
            self.id,
            format_cents(self.principal_cents),
            self.rate_bps / 100,
            self.rate_bps % 100,
            self.term_months,
            format_cents(self.outstanding_cents),
            self.status.as_str()
        )
    }
}

/// Simple interest: principal * rate * years, rounded down to the cent.
pub fn total_due(principal_cents: i64, rate_bps: i64, term_months: i64) -> Result<i64, BankError> {
    let interest = i128::from(principal_cents) * i128::from(rate_bps) * i128::from(term_months) / 120_000;
    i64::try_from(i128::from(principal_cents) + interest)
        .map_err(|_| BankError::InvalidAmount("loan total is too large".to_string()))
}

const LOAN_COLUMNS: &str =
    "id, account_id, principal_cents, rate_bps, term_months, outstanding_cents, status, created_at";

fn owned_loan(conn: &Connection, user_id: i64, loan_id: i64) -> Result<Loan, BankError> {
    conn.query_row(
        &format!("SELECT {LOAN_COLUMNS} FROM loans WHERE id = ?1 AND user_id = ?2"),
        params![loan_id, user_id],
        Loan::from_row,
    )
    .optional()?
    .ok_or_else(|| BankError::NotFound(format!("loan #{loan_id}")))
}

impl Bank {
    /// Grant a loan and credit the principal to `account_number`.
    pub fn apply_loan(
        &mut self,
        user: &User,
        account_number: &str,
        principal_cents: i64,
        rate_bps: i64,
        term_months: i64,
    ) -> Result<Loan, BankError> {
        ensure_positive(principal_cents)?;
        if !(0..=MAX_RATE_BPS).contains(&rate_bps) {
            return Err(BankError::InvalidInput(format!(
                "rate must be between 0 and {MAX_RATE_BPS} basis points"
            )));
        }
        if !(1..=MAX_TERM_MONTHS).contains(&term_months) {
            return Err(BankError::InvalidInput(format!(
                "term must be between 1 and {MAX_TERM_MONTHS} months"
            )));
        }
        let outstanding_cents = total_due(principal_cents, rate_bps, term_months)?;

        let tx = self.conn.transaction()?;
        let account = owned_account(&tx, user.id, account_number)?;
        let created_at = now_rfc3339();
        tx.execute(
            "INSERT INTO loans (user_id, account_id, principal_cents, rate_bps, term_months,
                                outstanding_cents, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'active', ?7)",
            params![
                user.id,
                account.id,
                principal_cents,
                rate_bps,
                term_months,
                outstanding_cents,
                created_at
            ],
        )?;
        let loan = Loan {
            id: tx.last_insert_rowid(),
            account_id: account.id,
            principal_cents,
            rate_bps,
            term_months,
            outstanding_cents,
            status: LoanStatus::Active,
            created_at,
        };
        credit(
            &tx,
            account.id,
            principal_cents,
            "loan_credit",
            None,
            &format!("loan #{}", loan.id),
        )?;
        tx.commit()?;

        log::info!("Loan #{} granted to {}", loan.id, user.username);
        Ok(loan)
    }

    /// Pay towards a loan from one of `user`'s accounts. Payments above the
    /// outstanding amount are capped; the loan flips to paid at zero.
    pub fn pay_loan(
        &mut self,
        user: &User,
        loan_id: i64,
        account_number: &str,
        amount_cents: i64,
    ) -> Result<Loan, BankError> {
        ensure_positive(amount_cents)?;
        let tx = self.conn.transaction()?;
        let mut loan = owned_loan(&tx, user.id, loan_id)?;
        if loan.status == LoanStatus::Paid {
            return Err(BankError::InvalidState(format!("loan #{loan_id} is already paid")));
        }
        let account = owned_account(&tx, user.id, account_number)?;
        let payment = amount_cents.min(loan.outstanding_cents);

        debit(
            &tx,
            account.id,
            payment,
            "loan_payment",
            None,
            &format!("loan #{loan_id}"),
        )?;
        tx.execute(
            "INSERT INTO loan_payments (loan_id, amount_cents, paid_at) VALUES (?1, ?2, ?3)",
            params![loan_id, payment, now_rfc3339()],
        )?;

        loan.outstanding_cents -= payment;
        if loan.outstanding_cents == 0 {
            loan.status = LoanStatus::Paid;
        }
        tx.execute(
            "UPDATE loans SET outstanding_cents = ?1, status = ?2 WHERE id = ?3",
            params![loan.outstanding_cents, loan.status.as_str(), loan_id],
        )?;
        tx.commit()?;
        Ok(loan)
    }

    pub fn loans(&self, user: &User) -> Result<Vec<Loan>, BankError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {LOAN_COLUMNS} FROM loans WHERE user_id = ?1 ORDER BY id"))?;
        let rows = stmt.query_map(params![user.id], Loan::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Account;

    fn setup() -> (Bank, User, Account) {
        let mut bank = Bank::open_in_memory().unwrap();
        let user = bank.register("alice", "alice@example.com", "password123").unwrap();
        let account = bank.accounts(&user).unwrap().remove(0);
        (bank, user, account)
    }

    #[test]
    fn test_total_due_simple_interest() {
        // 5% for 12 months on $1000
        assert_eq!(total_due(100_000, 500, 12).unwrap(), 105_000);
        assert_eq!(total_due(100_000, 0, 12).unwrap(), 100_000);
        // 7.5% for 6 months on $333.33 -> 1249.9875 cents of interest, floored
        assert_eq!(total_due(33_333, 750, 6).unwrap(), 33_333 + 1_249);
    }

    #[test]
    fn test_apply_loan_credits_account() {
        let (mut bank, user, account) = setup();
        let loan = bank.apply_loan(&user, &account.number, 100_000, 500, 12).unwrap();
        assert_eq!(loan.outstanding_cents, 105_000);
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(bank.account(&user, &account.number).unwrap().balance_cents, 100_000);
        assert_eq!(bank.history(&user, &account.number, None).unwrap()[0].kind, "loan_credit");
    }

    #[test]
    fn test_apply_loan_validation() {
        let (mut bank, user, account) = setup();
        assert!(matches!(
            bank.apply_loan(&user, &account.number, 0, 500, 12),
            Err(BankError::InvalidAmount(_))
        ));
        assert!(matches!(
            bank.apply_loan(&user, &account.number, 1000, -1, 12),
            Err(BankError::InvalidInput(_))
        ));
        assert!(matches!(
            bank.apply_loan(&user, &account.number, 1000, 500, 0),
            Err(BankError::InvalidInput(_))
        ));
        assert!(bank.loans(&user).unwrap().is_empty());
    }

    #[test]
    fn test_pay_loan_caps_and_flips_status() {
        let (mut bank, user, account) = setup();
        let loan = bank.apply_loan(&user, &account.number, 10_000, 1_000, 12).unwrap();
        assert_eq!(loan.outstanding_cents, 11_000);
        bank.deposit(&user, &account.number, 5_000).unwrap();

        let loan = bank.pay_loan(&user, loan.id, &account.number, 4_000).unwrap();
        assert_eq!(loan.outstanding_cents, 7_000);
        assert_eq!(loan.status, LoanStatus::Active);

        // overpayment only takes what is owed
        let loan = bank.pay_loan(&user, loan.id, &account.number, 9_999).unwrap();
        assert_eq!(loan.outstanding_cents, 0);
        assert_eq!(loan.status, LoanStatus::Paid);
        assert_eq!(
            bank.account(&user, &account.number).unwrap().balance_cents,
            15_000 - 11_000
        );

        assert!(matches!(
            bank.pay_loan(&user, loan.id, &account.number, 100),
            Err(BankError::InvalidState(_))
        ));
        assert_eq!(bank.loans(&user).unwrap()[0].status, LoanStatus::Paid);
    }

    #[test]
    fn test_pay_loan_insufficient_funds_changes_nothing() {
        let (mut bank, user, account) = setup();
        let loan = bank.apply_loan(&user, &account.number, 1_000, 0, 1).unwrap();
        bank.withdraw(&user, &account.number, 900).unwrap();

        assert!(matches!(
            bank.pay_loan(&user, loan.id, &account.number, 1_000),
            Err(BankError::InsufficientFunds { .. })
        ));
        assert_eq!(bank.loans(&user).unwrap()[0].outstanding_cents, 1_000);
        assert_eq!(bank.account(&user, &account.number).unwrap().balance_cents, 100);
    }
}
