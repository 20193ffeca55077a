// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::Path;

use anyhow::Result;
use atm_ledger::application::LedgerService;
use atm_ledger::domain::{AccountBook, LoanBook, Money};
use atm_ledger::storage::StoreConfig;
use tempfile::TempDir;

/// Helper to create a test service over a temporary data directory
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = service_in(temp_dir.path());
    Ok((service, temp_dir))
}

/// Another service over the same directory, like a second command invocation
pub fn service_in(dir: &Path) -> LedgerService {
    LedgerService::open(StoreConfig::in_dir(dir))
}

pub fn money(amount: i64) -> Money {
    Money::from(amount)
}

/// Test fixture: write balances straight into the accounts store
pub async fn seed_accounts(service: &LedgerService, balances: &[(&str, i64)]) -> Result<()> {
    let book: AccountBook = balances
        .iter()
        .map(|(id, balance)| (id.to_string(), money(*balance)))
        .collect();
    service.stores().accounts.save_accounts(&book).await?;
    Ok(())
}

/// Test fixture: write debts straight into the loans store
pub async fn seed_loans(service: &LedgerService, loans: &[(&str, i64)]) -> Result<()> {
    let book: LoanBook = loans
        .iter()
        .map(|(id, owed)| (id.to_string(), money(*owed)))
        .collect();
    service.stores().loans.save_loans(&book).await?;
    Ok(())
}

pub async fn balance_of(service: &LedgerService, id: &str) -> Result<Option<Money>> {
    let accounts = service.stores().accounts.load_accounts().await?;
    Ok(accounts.get(id).copied())
}

/// Raw bytes of every store file, for asserting nothing was written
pub fn snapshot(dir: &Path) -> Vec<Option<Vec<u8>>> {
    ["accounts.json", "loans.json", "session.json"]
        .iter()
        .map(|name| std::fs::read(dir.join(name)).ok())
        .collect()
}
