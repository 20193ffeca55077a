pub mod application;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod storage;

pub use application::{AppError, LedgerService};
pub use domain::*;
pub use storage::{StoreConfig, Stores};
