use thiserror::Error;

use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} store has not been initialized")]
    StoreUninitialized(String),

    #[error("Account {0} is currently logged in")]
    SessionAlreadyActive(String),

    #[error("You need to login")]
    NotLoggedIn,

    #[error("Account name cannot be empty")]
    EmptyAccountId,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account {0} cannot transfer to itself")]
    SelfTransfer(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Uninitialized(store) => AppError::StoreUninitialized(store.to_string()),
            StoreError::SessionAlreadyActive(current) => AppError::SessionAlreadyActive(current),
            other => AppError::Store(other),
        }
    }
}
