mod account;
mod money;
mod session;

pub use account::*;
pub use money::*;
pub use session::*;
