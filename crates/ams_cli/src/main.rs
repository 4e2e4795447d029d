//! Command-line front end for the account store.
//!
//! # Responsibility
//! - Map a handful of subcommands onto `AccountService` calls.
//! - Keep output line-oriented and deterministic for scripting.
//!
//! # Usage
//!
//! ```bash
//! ams add Lee 1111 10000
//! ams add Kim 2222 0 100000      # overdraft with a 100000 credit line
//! AMS_STORE_PATH=/tmp/accounts.dbf ams list
//! ams --log-dir /var/log/ams remove 1000
//! ```
//!
//! Exit codes: 0 success, 1 usage or storage error, 2 not found.

use ams_core::{
    default_log_level, init_logging, Account, AccountService, FileAccountRepository, RepoResult,
    DEFAULT_STORE_PATH,
};
use clap::{Parser, Subcommand};
use log::warn;
use std::path::PathBuf;
use std::process::ExitCode;

/// Flat-file bank account store.
#[derive(Parser, Debug, Clone)]
#[command(name = "ams")]
#[command(version, about = "Bank account record store", long_about = None)]
struct Cli {
    /// Account file to open or create.
    #[arg(long, global = true, env = "AMS_STORE_PATH", default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,

    /// Absolute directory for rolling log files. Logging stays off when unset.
    #[arg(long, global = true, env = "AMS_LOG_DIR")]
    log_dir: Option<String>,

    /// Log level: trace, debug, info, warn or error.
    ///
    /// Default: debug in debug builds, info in release builds.
    #[arg(long, global = true, env = "AMS_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Print the number of allocated records, including removed ones.
    Count,
    /// List active accounts in file order.
    List,
    /// Open an account; passing `borrowed` makes it an overdraft account.
    #[command(allow_negative_numbers = true)]
    Add {
        owner: String,
        password: i32,
        /// Deposit for overdraft accounts, balance otherwise.
        balance: i64,
        /// Credit line folded into the visible balance.
        borrowed: Option<i64>,
    },
    /// Find one active account by number.
    Find { number: String },
    /// Find active accounts by owner name.
    Owner { name: String },
    /// Soft-delete an account by number.
    Remove { number: String },
    /// Run an add/list/search/remove walkthrough.
    Demo,
}

fn format_account(account: &Account) -> String {
    match account.borrowed() {
        Some(borrowed) => format!(
            "{}\t{}\t{}\toverdraft\tborrowed={}",
            account.number, account.owner, account.balance, borrowed
        ),
        None => format!(
            "{}\t{}\t{}\tstandard",
            account.number, account.owner, account.balance
        ),
    }
}

/// Runs `command`, returning `false` when the target was not found.
fn run(service: &AccountService<FileAccountRepository>, command: Command) -> RepoResult<bool> {
    match command {
        Command::Count => {
            println!("{}", service.count()?);
            Ok(true)
        }
        Command::List => {
            for account in service.list_accounts()? {
                println!("{}", format_account(&account));
            }
            Ok(true)
        }
        Command::Add {
            owner,
            password,
            balance,
            borrowed,
        } => {
            let account = match borrowed {
                Some(borrowed) => service.open_overdraft(owner, password, balance, borrowed)?,
                None => service.open_standard(owner, password, balance)?,
            };
            println!("{}", account.number);
            Ok(true)
        }
        Command::Find { number } => match service.find_by_number(&number)? {
            Some(account) => {
                println!("{}", format_account(&account));
                Ok(true)
            }
            None => Ok(false),
        },
        Command::Owner { name } => {
            let accounts = service.find_by_owner(&name)?;
            for account in &accounts {
                println!("{}", format_account(account));
            }
            Ok(!accounts.is_empty())
        }
        Command::Remove { number } => service.close_account(&number),
        Command::Demo => run_demo(service).map(|()| true),
    }
}

fn run_demo(service: &AccountService<FileAccountRepository>) -> RepoResult<()> {
    println!("## add");
    let first = service.open_standard("Lee", 1111, 10_000)?;
    service.open_overdraft("Kim", 1111, 0, 100_000)?;
    service.open_standard("Lee", 1111, 70_000)?;

    println!("## list");
    for account in service.list_accounts()? {
        println!("{}", format_account(&account));
    }

    println!("## find {}", first.number);
    if let Some(account) = service.find_by_number(&first.number)? {
        println!("{}", format_account(&account));
    }

    println!("## owner Lee");
    for account in service.find_by_owner("Lee")? {
        println!("{}", format_account(&account));
    }

    println!("## remove {}", first.number);
    service.close_account(&first.number)?;
    for account in service.list_accounts()? {
        println!("{}", format_account(&account));
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let repo = match FileAccountRepository::open(&cli.store) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("cannot open `{}`: {err}", cli.store.display());
            return ExitCode::from(1);
        }
    };
    let service = AccountService::new(repo);

    match run(&service, cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("not found");
            ExitCode::from(2)
        }
        Err(err) => {
            warn!("event=cli_command module=cli status=error error={}", err);
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}
