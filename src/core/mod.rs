pub mod amount;
pub mod ledger;
pub mod error;

pub use amount::Amount;
pub use ledger::{Balance, Ledger};
pub use error::AmountError;
