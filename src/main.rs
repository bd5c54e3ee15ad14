use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::ffi::OsString;
use std::fs::File;
use std::path::Path;

use zelda::bank::cli::BankArgs;
use zelda::core::config::{ZeldaConfig, load_config, resolve};

#[derive(Parser)]
#[command(name = "zelda", about = "A small desktop in your terminal")]
struct Args {
    /// Whose layout, notes and reminders to load
    #[arg(short, long)]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Personal banking on a local SQLite database
    Bank(BankArgs),
}

/// Load `.env` (or `env_file`), then parse `argv`.
///
/// The env file must be loaded first so `env = ...` fallbacks such as
/// `ZELDA_BANK_PASSWORD` can see its values.
fn parse_args<I, T>(env_file: Option<&Path>, argv: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    if let Some(path) = env_file {
        dotenv::from_path(path).ok();
    } else {
        dotenv::dotenv().ok();
    }
    Args::try_parse_from(argv)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = parse_args(None, std::env::args_os()).unwrap_or_else(|e| e.exit());

    // Initialize file logger - writes to zelda.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("zelda.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = load_config().unwrap_or_else(|e| {
        log::warn!("Failed to load config, using defaults: {}", e);
        ZeldaConfig::default()
    });
    let resolved = resolve(&config, args.user.as_deref());

    match args.command {
        Some(Command::Bank(bank_args)) => {
            log::info!("Bank command for {}", bank_args.user);
            if let Err(e) = zelda::bank::cli::run(bank_args, &resolved.bank_database) {
                log::warn!("Bank command failed: {}", e);
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        None => {
            log::info!("Zelda TUI OS starting up for user {}", resolved.user);
            zelda::tui::run(resolved)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_password_from_env_file() {
        let dir = std::env::temp_dir().join(format!("zelda-env-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let env_file = dir.join(".env");
        std::fs::write(&env_file, "ZELDA_BANK_PASSWORD=hunter2hunter2\n").unwrap();

        let args = parse_args(
            Some(&env_file),
            ["zelda", "bank", "--user", "link", "register", "--email", "link@hyrule.org"],
        )
        .unwrap();
        match args.command {
            Some(Command::Bank(bank)) => assert_eq!(bank.password, "hunter2hunter2"),
            None => panic!("expected the bank subcommand"),
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
