//! `zelda bank ...` subcommands.
//!
//! Every invocation logs in (or registers) with `--user`/`--password`, runs a
//! single operation against its own connection, and prints the result.

use std::path::Path;

use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::accounts::AccountKind;
use super::money::{format_cents, parse_amount};
use super::payments::parse_date;
use super::{Bank, BankError, User};

#[derive(Args, Debug)]
pub struct BankArgs {
    /// Bank username
    #[arg(long)]
    pub user: String,

    /// Bank password
    #[arg(long, env = "ZELDA_BANK_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[command(subcommand)]
    pub command: BankCommand,
}

#[derive(Subcommand, Debug)]
pub enum BankCommand {
    /// Create a new user with a checking account
    Register {
        #[arg(long)]
        email: String,
    },
    /// List accounts and balances
    Accounts,
    /// Open another account (checking or savings)
    Open {
        #[arg(default_value = "checking")]
        kind: String,
    },
    Deposit {
        account: String,
        amount: String,
    },
    Withdraw {
        account: String,
        amount: String,
    },
    Transfer {
        from: String,
        to: String,
        amount: String,
    },
    /// Recent transactions, newest first
    History {
        account: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    #[command(subcommand)]
    Card(CardCommand),
    #[command(subcommand)]
    Loan(LoanCommand),
    #[command(subcommand)]
    Request(RequestCommand),
    #[command(subcommand)]
    Bill(BillCommand),
    #[command(subcommand)]
    Recurring(RecurringCommand),
    /// Message support, or show the conversation when no message is given
    Chat { message: Option<String> },
}

#[derive(Subcommand, Debug)]
pub enum CardCommand {
    Issue { account: String },
    Block { id: i64 },
    Unblock { id: i64 },
    List,
}

#[derive(Subcommand, Debug)]
pub enum LoanCommand {
    /// Borrow `amount` into `account`; rate is annual, in basis points
    Apply {
        account: String,
        amount: String,
        #[arg(long, default_value_t = 500)]
        rate_bps: i64,
        #[arg(long, default_value_t = 12)]
        months: i64,
    },
    Pay {
        id: i64,
        account: String,
        amount: String,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub enum RequestCommand {
    /// Ask another user for money
    Send {
        from_user: String,
        amount: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    Pay {
        id: i64,
        account: String,
    },
    Decline {
        id: i64,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub enum BillCommand {
    Add {
        account: String,
        payee: String,
        amount: String,
        /// YYYY-MM-DD
        due: String,
    },
    Pay {
        id: i64,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub enum RecurringCommand {
    Add {
        from: String,
        to: String,
        amount: String,
        #[arg(long, default_value_t = 30)]
        every_days: i64,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        first_run: Option<String>,
    },
    Cancel {
        id: i64,
    },
    List,
    /// Execute every schedule due on or before `--today`
    Run {
        #[arg(long)]
        today: Option<String>,
    },
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn lines_or<T>(items: &[T], empty: &str, render: impl Fn(&T) -> String) -> Vec<String> {
    if items.is_empty() {
        vec![empty.to_string()]
    } else {
        items.iter().map(render).collect()
    }
}

/// Open the database at `database`, run one command and print its output.
pub fn run(args: BankArgs, database: &Path) -> Result<(), BankError> {
    let mut bank = Bank::open(database)?;
    for line in execute(&mut bank, args)? {
        println!("{line}");
    }
    Ok(())
}

/// Run one command and return the lines to print.
pub fn execute(bank: &mut Bank, args: BankArgs) -> Result<Vec<String>, BankError> {
    if let BankCommand::Register { email } = &args.command {
        let user = bank.register(&args.user, email, &args.password)?;
        let account = bank
            .accounts(&user)?
            .into_iter()
            .next()
            .map(|a| a.number)
            .unwrap_or_default();
        return Ok(vec![format!(
            "Registered {}. Checking account {account} is ready.",
            user.username
        )]);
    }

    let user = bank.login(&args.user, &args.password)?;
    log::info!("Bank command {:?} for {}", args.command, user.username);
    dispatch(bank, &user, args.command)
}

fn dispatch(bank: &mut Bank, user: &User, command: BankCommand) -> Result<Vec<String>, BankError> {
    let lines = match command {
        BankCommand::Register { .. } => {
            return Err(BankError::InvalidState("already registered".to_string()));
        }
        BankCommand::Accounts => lines_or(&bank.accounts(user)?, "No accounts.", |a| a.summary()),
        BankCommand::Open { kind } => {
            let account = bank.open_account(user, AccountKind::parse(&kind)?)?;
            vec![format!("Opened {} account {}.", account.kind, account.number)]
        }
        BankCommand::Deposit { account, amount } => {
            let amount = parse_amount(&amount)?;
            let account = bank.deposit(user, &account, amount)?;
            vec![format!(
                "Deposited {}. New balance: {}",
                format_cents(amount),
                format_cents(account.balance_cents)
            )]
        }
        BankCommand::Withdraw { account, amount } => {
            let amount = parse_amount(&amount)?;
            let account = bank.withdraw(user, &account, amount)?;
            vec![format!(
                "Withdrew {}. New balance: {}",
                format_cents(amount),
                format_cents(account.balance_cents)
            )]
        }
        BankCommand::Transfer { from, to, amount } => {
            let amount = parse_amount(&amount)?;
            let account = bank.transfer(user, &from, &to, amount)?;
            vec![format!(
                "Transferred {} to {to}. New balance: {}",
                format_cents(amount),
                format_cents(account.balance_cents)
            )]
        }
        BankCommand::History { account, limit } => {
            lines_or(&bank.history(user, &account, limit)?, "No transactions.", |t| t.display())
        }
        BankCommand::Card(cmd) => match cmd {
            CardCommand::Issue { account } => {
                let card = bank.issue_card(user, &account)?;
                vec![format!("Issued card #{}: {}", card.id, card.display())]
            }
            CardCommand::Block { id } => vec![format!("Blocked card #{}.", bank.block_card(user, id)?.id)],
            CardCommand::Unblock { id } => vec![format!("Unblocked card #{}.", bank.unblock_card(user, id)?.id)],
            CardCommand::List => lines_or(&bank.cards(user)?, "No cards.", |c| format!("#{}  {}", c.id, c.display())),
        },
        BankCommand::Loan(cmd) => match cmd {
            LoanCommand::Apply {
                account,
                amount,
                rate_bps,
                months,
            } => {
                let loan = bank.apply_loan(user, &account, parse_amount(&amount)?, rate_bps, months)?;
                vec![format!(
                    "Loan #{} approved. Total to repay: {}",
                    loan.id,
                    format_cents(loan.outstanding_cents)
                )]
            }
            LoanCommand::Pay { id, account, amount } => {
                let loan = bank.pay_loan(user, id, &account, parse_amount(&amount)?)?;
                if loan.outstanding_cents == 0 {
                    vec![format!("Loan #{} is fully paid.", loan.id)]
                } else {
                    vec![format!(
                        "Payment recorded. Outstanding on loan #{}: {}",
                        loan.id,
                        format_cents(loan.outstanding_cents)
                    )]
                }
            }
            LoanCommand::List => lines_or(&bank.loans(user)?, "No loans.", |l| l.display()),
        },
        BankCommand::Request(cmd) => match cmd {
            RequestCommand::Send {
                from_user,
                amount,
                note,
            } => {
                let request = bank.request_money(user, &from_user, parse_amount(&amount)?, &note)?;
                vec![format!(
                    "Requested {} from {} (request #{}).",
                    format_cents(request.amount_cents),
                    request.payer,
                    request.id
                )]
            }
            RequestCommand::Pay { id, account } => {
                let request = bank.pay_request(user, id, &account)?;
                vec![format!(
                    "Paid {} to {}.",
                    format_cents(request.amount_cents),
                    request.requester
                )]
            }
            RequestCommand::Decline { id } => {
                vec![format!("Declined request #{}.", bank.decline_request(user, id)?.id)]
            }
            RequestCommand::List => lines_or(&bank.requests(user)?, "No requests.", |r| r.display()),
        },
        BankCommand::Bill(cmd) => match cmd {
            BillCommand::Add {
                account,
                payee,
                amount,
                due,
            } => {
                let bill = bank.add_bill(user, &account, &payee, parse_amount(&amount)?, &due)?;
                vec![format!("Added bill #{}: {}", bill.id, bill.display())]
            }
            BillCommand::Pay { id } => {
                let bill = bank.pay_bill(user, id)?;
                vec![format!(
                    "Paid {} to {}.",
                    format_cents(bill.amount_cents),
                    bill.payee
                )]
            }
            BillCommand::List => lines_or(&bank.bills(user)?, "No bills.", |b| b.display()),
        },
        BankCommand::Recurring(cmd) => match cmd {
            RecurringCommand::Add {
                from,
                to,
                amount,
                every_days,
                first_run,
            } => {
                let first_run = first_run.unwrap_or_else(|| today().format("%Y-%m-%d").to_string());
                let schedule =
                    bank.schedule_transfer(user, &from, &to, parse_amount(&amount)?, every_days, &first_run)?;
                vec![format!("Scheduled #{}: {}", schedule.id, schedule.display())]
            }
            RecurringCommand::Cancel { id } => {
                vec![format!("Cancelled recurring transfer #{}.", bank.cancel_recurring(user, id)?.id)]
            }
            RecurringCommand::List => {
                lines_or(&bank.recurring(user)?, "No recurring transfers.", |r| r.display())
            }
            RecurringCommand::Run { today: date } => {
                let date = match date {
                    Some(d) => parse_date(&d)?,
                    None => today(),
                };
                let runs = bank.run_due_transfers(date)?;
                lines_or(&runs, "Nothing due.", |run| match &run.error {
                    None => format!("#{}: {} transfer(s) executed", run.schedule_id, run.executed),
                    Some(e) => format!(
                        "#{}: {} transfer(s) executed, then failed: {e}",
                        run.schedule_id, run.executed
                    ),
                })
            }
        },
        BankCommand::Chat { message } => match message {
            Some(message) => vec![format!("support: {}", bank.send_chat(user, &message)?.message)],
            None => lines_or(&bank.chat_log(user)?, "No messages yet.", |m| m.display()),
        },
    };
    Ok(lines)
}
