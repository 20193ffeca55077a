use std::path::PathBuf;

use crate::domain::AccountBook;

use super::{JsonStore, StagedWrite, StoreError};

/// Balances of every account ever logged into.
#[derive(Debug, Clone)]
pub struct AccountStore {
    store: JsonStore<AccountBook>,
}

impl AccountStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            store: JsonStore::new("accounts", path),
        }
    }

    pub async fn load_accounts(&self) -> Result<AccountBook, StoreError> {
        self.store.load().await
    }

    pub async fn save_accounts(&self, accounts: &AccountBook) -> Result<(), StoreError> {
        self.store.save(accounts).await
    }

    pub async fn stage_accounts(&self, accounts: &AccountBook) -> Result<StagedWrite, StoreError> {
        self.store.stage(accounts).await
    }
}
