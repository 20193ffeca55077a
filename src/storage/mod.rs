mod account_store;
mod error;
mod json_store;
mod loan_store;
mod lock;
mod session_store;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{AccountBook, LoanBook};

pub use account_store::*;
pub use error::*;
pub use json_store::*;
pub use loan_store::*;
pub use lock::*;
pub use session_store::*;

pub const ACCOUNTS_FILE: &str = "accounts.json";
pub const LOANS_FILE: &str = "loans.json";
pub const SESSION_FILE: &str = "session.json";
pub const LOCK_FILE: &str = "ledger.lock";

/// Where each store lives on disk. Unset paths leave that store uninitialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub accounts: Option<PathBuf>,
    pub loans: Option<PathBuf>,
    pub session: Option<PathBuf>,
    pub lock: Option<PathBuf>,
}

impl StoreConfig {
    /// Standard layout: all store files side by side in `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            accounts: Some(dir.join(ACCOUNTS_FILE)),
            loans: Some(dir.join(LOANS_FILE)),
            session: Some(dir.join(SESSION_FILE)),
            lock: Some(dir.join(LOCK_FILE)),
        }
    }
}

/// The three ledger stores plus the lock that serialises access to them.
#[derive(Debug, Clone)]
pub struct Stores {
    pub session: SessionStore,
    pub accounts: AccountStore,
    pub loans: LoanStore,
    lock: Option<PathBuf>,
}

impl Stores {
    pub fn open(config: StoreConfig) -> Self {
        Self {
            session: SessionStore::new(config.session),
            accounts: AccountStore::new(config.accounts),
            loans: LoanStore::new(config.loans),
            lock: config.lock,
        }
    }

    /// Take the exclusive lock covering every store.
    /// Hold the returned guard across the whole load-modify-save cycle.
    pub async fn lock(&self) -> Result<StoreLock, StoreError> {
        let path = self
            .lock
            .as_deref()
            .ok_or(StoreError::Uninitialized("lock"))?;
        StoreLock::acquire(path).await
    }

    /// Persist the books after a debit of `account_id`.
    ///
    /// Both files are staged before either is renamed, and loans go in before
    /// accounts: an interrupted commit can leave debt recorded against a
    /// balance that was not yet reduced, but never the reverse.
    pub async fn save_debit(
        &self,
        _lock: &StoreLock,
        account_id: &str,
        accounts: &AccountBook,
        loans: &LoanBook,
    ) -> Result<(), StoreError> {
        let mut commit = Commit::new();
        commit.push(self.loans.stage_loans(loans, account_id).await?);
        commit.push(self.accounts.stage_accounts(accounts).await?);
        commit.commit()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::Money;

    use super::*;

    fn book(entries: &[(&str, i64)]) -> AccountBook {
        entries
            .iter()
            .map(|(id, amount)| (id.to_string(), Money::from(*amount)))
            .collect()
    }

    #[tokio::test]
    async fn test_save_debit_writes_both_books() {
        let dir = tempfile::tempdir().unwrap();
        let stores = Stores::open(StoreConfig::in_dir(dir.path()));
        let lock = stores.lock().await.unwrap();

        stores
            .save_debit(&lock, "boss", &book(&[("boss", 0)]), &book(&[("boss", 400)]))
            .await
            .unwrap();

        assert_eq!(stores.accounts.load_accounts().await.unwrap()["boss"], Money::ZERO);
        assert_eq!(stores.loans.load_loans().await.unwrap()["boss"], Money::from(400));
    }

    #[tokio::test]
    async fn test_failed_accounts_rename_keeps_loans_ahead() {
        let dir = tempfile::tempdir().unwrap();
        let accounts_path = dir.path().join(ACCOUNTS_FILE);
        // A directory where the accounts file should be makes its rename fail
        std::fs::create_dir(&accounts_path).unwrap();

        let stores = Stores::open(StoreConfig::in_dir(dir.path()));
        stores.loans.save_loans(&book(&[("boss", 100)])).await.unwrap();
        let lock = stores.lock().await.unwrap();

        let err = stores
            .save_debit(&lock, "boss", &book(&[("boss", 0)]), &book(&[("boss", 500)]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Persist(_)));
        // The error owns the unplaced temp file; dropping it removes the file
        drop(err);

        // Debt went in first; the accounts target is untouched
        assert_eq!(stores.loans.load_loans().await.unwrap()["boss"], Money::from(500));
        assert!(accounts_path.is_dir());
        assert_eq!(std::fs::read_dir(&accounts_path).unwrap().count(), 0);

        // No staged temp files are left behind
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_failed_staging_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let stores = Stores::open(StoreConfig::in_dir(dir.path()));
        stores.loans.save_loans(&book(&[("boss", 100)])).await.unwrap();
        stores.accounts.save_accounts(&book(&[("boss", 50)])).await.unwrap();
        let lock = stores.lock().await.unwrap();

        let err = stores
            .save_debit(&lock, "boss", &book(&[("boss", 0)]), &book(&[("boss", -1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NegativeLoan { .. }));

        assert_eq!(stores.loans.load_loans().await.unwrap()["boss"], Money::from(100));
        assert_eq!(stores.accounts.load_accounts().await.unwrap()["boss"], Money::from(50));
    }
}
