use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} store has not been initialized")]
    Uninitialized(&'static str),

    #[error("Account {0} must logout first")]
    SessionAlreadyActive(String),

    #[error("Loan for account {id} cannot be negative: {owed}")]
    NegativeLoan { id: String, owed: String },

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to replace store file: {0}")]
    Persist(#[from] tempfile::PersistError),
}
