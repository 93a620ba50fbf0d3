mod core;
pub mod backend;
pub mod config;
pub mod frontend;

pub use crate::core::{Amount, AmountError, Balance, Ledger};
pub use crate::core::{amount, ledger, error};
