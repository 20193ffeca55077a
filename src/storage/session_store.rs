use std::path::PathBuf;

use tracing::debug;

use crate::domain::SessionState;

use super::{JsonStore, StoreError};

/// The single session slot: the id of the logged-in account, or empty.
#[derive(Debug, Clone)]
pub struct SessionStore {
    store: JsonStore<String>,
}

impl SessionStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            store: JsonStore::new("session", path),
        }
    }

    /// The active account id, or an empty string when nobody is logged in.
    pub async fn load_session(&self) -> Result<String, StoreError> {
        self.store.load().await
    }

    /// Start a session for `account_id`.
    /// Fails if another session is still active.
    pub async fn save_session(&self, account_id: &str) -> Result<(), StoreError> {
        if let SessionState::LoggedIn(current) = self.state().await? {
            return Err(StoreError::SessionAlreadyActive(current));
        }

        let next = SessionState::from_slot(account_id.to_string());
        self.store.save(&next.into_slot()).await?;
        debug!(account = account_id, "session started");
        Ok(())
    }

    /// Empty the slot and hand back whoever was in it (possibly nobody).
    pub async fn clear_session(&self) -> Result<String, StoreError> {
        let previous = self.state().await?;
        self.store.save(&SessionState::LoggedOut.into_slot()).await?;
        Ok(previous.into_slot())
    }

    async fn state(&self) -> Result<SessionState, StoreError> {
        Ok(SessionState::from_slot(self.load_session().await?))
    }
}
