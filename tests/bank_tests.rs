use chrono::NaiveDate;
use clap::Parser;
use zelda::bank::cli::{BankArgs, execute};
use zelda::bank::{Bank, BankError, CardStatus, LoanStatus, User};

// ============================================================================
// Helper Functions
// ============================================================================

#[derive(Parser)]
struct Cli {
    #[command(flatten)]
    bank: BankArgs,
}

/// Run one `zelda bank` invocation against `bank`.
fn cli(bank: &mut Bank, user: &str, args: &[&str]) -> Result<Vec<String>, BankError> {
    let mut argv = vec!["zelda", "--user", user, "--password", "hunter2hunter2"];
    argv.extend_from_slice(args);
    execute(bank, Cli::try_parse_from(argv).unwrap().bank)
}

fn register(bank: &mut Bank, name: &str) -> (User, String) {
    let user = bank
        .register(name, &format!("{name}@hyrule.org"), "hunter2hunter2")
        .unwrap();
    let number = bank.accounts(&user).unwrap().remove(0).number;
    (user, number)
}

fn balance(bank: &Bank, user: &User, number: &str) -> i64 {
    bank.account(user, number).unwrap().balance_cents
}

fn scratch_db() -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("zelda-bank-it-{}", uuid::Uuid::new_v4()))
        .join("bank.db")
}

// ============================================================================
// End-to-end Flows
// ============================================================================

#[test]
fn test_data_survives_reopening_the_database() {
    let path = scratch_db();
    {
        let mut bank = Bank::open(&path).unwrap();
        let out = cli(&mut bank, "zelda", &["register", "--email", "zelda@hyrule.org"]).unwrap();
        assert!(out[0].starts_with("Registered zelda."));
    }

    // Each CLI run opens its own connection
    let mut bank = Bank::open(&path).unwrap();
    let user = bank.login("zelda", "hunter2hunter2").unwrap();
    let number = bank.accounts(&user).unwrap().remove(0).number;
    cli(&mut bank, "zelda", &["deposit", &number, "40"]).unwrap();
    drop(bank);

    let bank = Bank::open(&path).unwrap();
    assert_eq!(balance(&bank, &user, &number), 4000);
    drop(bank);
    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn test_transfer_between_users_and_history() {
    let mut bank = Bank::open_in_memory().unwrap();
    let (link, link_acct) = register(&mut bank, "link");
    let (zelda, zelda_acct) = register(&mut bank, "zelda");

    cli(&mut bank, "link", &["deposit", &link_acct, "100"]).unwrap();
    let out = cli(&mut bank, "link", &["transfer", &link_acct, &zelda_acct, "25.50"]).unwrap();
    assert_eq!(
        out,
        vec![format!("Transferred $25.50 to {zelda_acct}. New balance: $74.50")]
    );
    assert_eq!(balance(&bank, &zelda, &zelda_acct), 2550);

    let history = bank.history(&link, &link_acct, None).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].kind, "transfer_out");
    assert_eq!(history[0].amount_cents, 2550);

    // Zelda cannot read Link's history
    assert!(matches!(
        cli(&mut bank, "zelda", &["history", &link_acct]),
        Err(BankError::NotFound(_))
    ));
}

#[test]
fn test_overdraft_leaves_balances_untouched() {
    let mut bank = Bank::open_in_memory().unwrap();
    let (link, link_acct) = register(&mut bank, "link");
    let (_zelda, zelda_acct) = register(&mut bank, "zelda");
    cli(&mut bank, "link", &["deposit", &link_acct, "10"]).unwrap();

    let err = cli(&mut bank, "link", &["transfer", &link_acct, &zelda_acct, "10.01"]).unwrap_err();
    assert!(matches!(
        err,
        BankError::InsufficientFunds {
            balance_cents: 1000,
            requested_cents: 1001
        }
    ));
    assert_eq!(balance(&bank, &link, &link_acct), 1000);
    assert_eq!(bank.history(&link, &link_acct, None).unwrap().len(), 1);
}

#[test]
fn test_money_request_round_trip() {
    let mut bank = Bank::open_in_memory().unwrap();
    let (link, link_acct) = register(&mut bank, "link");
    let (zelda, zelda_acct) = register(&mut bank, "zelda");
    cli(&mut bank, "zelda", &["deposit", &zelda_acct, "50"]).unwrap();

    let out = cli(&mut bank, "link", &["request", "send", "zelda", "20", "--note", "arrows"]).unwrap();
    assert!(out[0].starts_with("Requested $20.00 from zelda"));
    let request_id = bank.requests(&zelda).unwrap()[0].id.to_string();

    let out = cli(&mut bank, "zelda", &["request", "pay", &request_id, &zelda_acct]).unwrap();
    assert_eq!(out, vec!["Paid $20.00 to link.".to_string()]);
    assert_eq!(balance(&bank, &zelda, &zelda_acct), 3000);
    assert_eq!(balance(&bank, &link, &link_acct), 2000);

    // A settled request cannot be paid twice
    assert!(cli(&mut bank, "zelda", &["request", "pay", &request_id, &zelda_acct]).is_err());
    assert_eq!(balance(&bank, &zelda, &zelda_acct), 3000);
}

#[test]
fn test_loan_lifecycle() {
    let mut bank = Bank::open_in_memory().unwrap();
    let (link, link_acct) = register(&mut bank, "link");

    let out = cli(&mut bank, "link", &["loan", "apply", &link_acct, "1000"]).unwrap();
    // 5% for 12 months
    assert!(out[0].ends_with("Total to repay: $1050.00"));
    assert_eq!(balance(&bank, &link, &link_acct), 100_000);

    cli(&mut bank, "link", &["deposit", &link_acct, "100"]).unwrap();
    let loan_id = bank.loans(&link).unwrap()[0].id.to_string();
    let out = cli(&mut bank, "link", &["loan", "pay", &loan_id, &link_acct, "2000"]).unwrap();
    assert_eq!(out, vec![format!("Loan #{loan_id} is fully paid.")]);

    // Overpayment is capped at what was owed
    assert_eq!(balance(&bank, &link, &link_acct), 110_000 - 105_000);
    assert_eq!(bank.loans(&link).unwrap()[0].status, LoanStatus::Paid);
}

#[test]
fn test_cards_bills_and_recurring() {
    let mut bank = Bank::open_in_memory().unwrap();
    let (link, link_acct) = register(&mut bank, "link");
    let (zelda, zelda_acct) = register(&mut bank, "zelda");
    cli(&mut bank, "link", &["deposit", &link_acct, "300"]).unwrap();

    cli(&mut bank, "link", &["card", "issue", &link_acct]).unwrap();
    let card_id = bank.cards(&link).unwrap()[0].id.to_string();
    cli(&mut bank, "link", &["card", "block", &card_id]).unwrap();
    assert_eq!(bank.cards(&link).unwrap()[0].status, CardStatus::Blocked);

    cli(
        &mut bank,
        "link",
        &["bill", "add", &link_acct, "Hyrule Power", "45.25", "2026-11-01"],
    )
    .unwrap();
    let bill_id = bank.bills(&link).unwrap()[0].id.to_string();
    let out = cli(&mut bank, "link", &["bill", "pay", &bill_id]).unwrap();
    assert_eq!(out, vec!["Paid $45.25 to Hyrule Power.".to_string()]);

    cli(
        &mut bank,
        "link",
        &[
            "recurring", "add", &link_acct, &zelda_acct, "10", "--every-days", "7", "--first-run",
            "2026-10-01",
        ],
    )
    .unwrap();
    let runs = bank
        .run_due_transfers(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
        .unwrap();
    // Oct 1, 8 and 15
    assert_eq!(runs[0].executed, 3);
    assert_eq!(balance(&bank, &zelda, &zelda_acct), 3000);
    assert_eq!(
        bank.recurring(&link).unwrap()[0].next_run,
        NaiveDate::from_ymd_opt(2026, 10, 22).unwrap()
    );
}

#[test]
fn test_support_chat_keeps_conversation() {
    let mut bank = Bank::open_in_memory().unwrap();
    register(&mut bank, "link");

    let out = cli(&mut bank, "link", &["chat", "I lost my card"]).unwrap();
    assert!(out[0].starts_with("support: "));

    let log = cli(&mut bank, "link", &["chat"]).unwrap();
    assert_eq!(log.len(), 2);
    assert!(log[0].contains("I lost my card"));
}
