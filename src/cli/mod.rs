use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::{format_money, parse_amount, to_money, Money};
use crate::storage::StoreConfig;

/// ATM - a command line ATM over a local ledger
#[derive(Parser)]
#[command(name = "atm-ledger")]
#[command(about = "Simulate an ATM: log in, deposit, withdraw and transfer money")]
#[command(version)]
pub struct Cli {
    /// Directory holding the accounts, loans and session files
    #[arg(short, long, env = "ATM_LEDGER_DIR", default_value = ".", global = true)]
    pub data_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in to an account (opened with a zero balance if new)
    Login {
        /// Account name
        account: String,
    },

    /// Log out the current account
    Logout,

    /// Deposit money into the current account
    Deposit {
        /// Amount of money
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Withdraw money from the current account
    Withdraw {
        /// Amount of money
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Transfer money to another account
    Transfer {
        /// Destination account
        account: String,

        /// Amount of money
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Show the current account's balance and loan
    Status,
}

impl Cli {
    pub fn service(&self) -> LedgerService {
        LedgerService::open(StoreConfig::in_dir(&self.data_dir))
    }

    pub async fn run(self) -> Result<()> {
        let service = self.service();

        match self.command {
            Commands::Login { account } => {
                let account = service.login(&account).await?;
                println!(
                    "Hello {}. Your balance is {}.",
                    account.name,
                    format_money(account.balance)
                );
            }

            Commands::Logout => {
                if let Some(account) = service.logout().await? {
                    println!("User {} has been logged out.", account);
                }
            }

            Commands::Deposit { amount } => {
                let balance = service.deposit(amount_arg(&amount)?).await?;
                println!("Your balance is {}.", format_money(balance));
            }

            Commands::Withdraw { amount } => {
                let balance = service.withdraw(amount_arg(&amount)?).await?;
                println!("Your balance is {}.", format_money(balance));
                print_loan(&service).await?;
            }

            Commands::Transfer { account, amount } => {
                let amount = amount_arg(&amount)?;
                let balance = service.transfer(&account, amount).await?;
                println!(
                    "Transferred {} to {}.",
                    format_money(to_money(amount).unwrap_or_default()),
                    account
                );
                println!("Your balance is {}.", format_money(balance));
                print_loan(&service).await?;
            }

            Commands::Status => match service.status().await? {
                Some(status) => {
                    println!(
                        "Logged in as {}. Your balance is {}.",
                        status.name,
                        format_money(status.balance)
                    );
                    if status.owed > Money::ZERO {
                        println!("You owe {}.", format_money(status.owed));
                    }
                }
                None => println!("Nobody is logged in."),
            },
        }

        Ok(())
    }
}

fn amount_arg(input: &str) -> Result<f64> {
    parse_amount(input).with_context(|| format!("Invalid amount '{}'. Use '50' or '12.5'", input))
}

async fn print_loan(service: &LedgerService) -> Result<()> {
    if let Some(status) = service.status().await?
        && status.owed > Money::ZERO
    {
        println!("You owe {}.", format_money(status.owed));
    }
    Ok(())
}
