use std::path::PathBuf;

use crate::domain::{LoanAccount, LoanBook, Money};

use super::{JsonStore, StagedWrite, StoreError};

/// Outstanding overdraft debt per account.
#[derive(Debug, Clone)]
pub struct LoanStore {
    store: JsonStore<LoanBook>,
}

impl LoanStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            store: JsonStore::new("loans", path),
        }
    }

    pub async fn load_loans(&self) -> Result<LoanBook, StoreError> {
        self.store.load().await
    }

    pub async fn save_loans(&self, loans: &LoanBook) -> Result<(), StoreError> {
        self.store.save(loans).await
    }

    /// Stage `loans` after checking the entry for `account_id`.
    /// Other accounts' entries are written back exactly as they were loaded.
    pub async fn stage_loans(
        &self,
        loans: &LoanBook,
        account_id: &str,
    ) -> Result<StagedWrite, StoreError> {
        let loan = LoanAccount::find(loans, account_id);
        if loan.owed < Money::ZERO {
            return Err(StoreError::NegativeLoan {
                id: loan.id,
                owed: loan.owed.to_string(),
            });
        }
        self.store.stage(loans).await
    }
}
