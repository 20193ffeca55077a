// Application layer - ledger use cases on top of the file stores.
// Every operation runs under the store lock: load, validate, mutate, save.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
