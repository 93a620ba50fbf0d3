use std::io;
use std::path::PathBuf;

use log::error;
use thiserror::Error;

use crate::core::{Amount, AmountError};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error
    },
    #[error("no element with id '{id}' in {}", .path.display())]
    MissingTable {
        path: PathBuf,
        id: String
    },
    #[error("row {row} of {} is not an amount: {source}", .path.display())]
    InvalidCell {
        path: PathBuf,
        row: usize,
        #[source]
        source: AmountError
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// Durable, append-only storage of the account's transactions.
pub trait LedgerStore {
    /// Every stored transaction in the order it was appended.
    fn load(&self) -> Result<Vec<Amount>>;

    /// Records one transaction after all existing ones.
    fn append(&self, amount: Amount) -> Result<()>;

    /// Like [`LedgerStore::load`], but any failure is logged and reads as an
    /// empty ledger. A single bad row therefore hides every transaction until
    /// the document is repaired; callers cannot tell this from a new ledger.
    fn read_all(&self) -> Vec<Amount> {
        self.load().unwrap_or_else(|err| {
            error!("Unexpected error occurred while reading transactions: {}", err);
            Vec::new()
        })
    }
}


#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::backend::{BackendError, LedgerStore, Result};
    use crate::core::{Amount, AmountError};

    #[derive(Default)]
    struct VecStore {
        rows: RefCell<Vec<Amount>>,
        corrupt: bool
    }

    impl LedgerStore for VecStore {
        fn load(&self) -> Result<Vec<Amount>> {
            if self.corrupt {
                return Err(BackendError::InvalidCell {
                    path: "memory".into(),
                    row: 1,
                    source: AmountError::Invalid("abc".to_owned())
                });
            }
            Ok(self.rows.borrow().clone())
        }

        fn append(&self, amount: Amount) -> Result<()> {
            self.rows.borrow_mut().push(amount);
            Ok(())
        }
    }

    #[test]
    fn read_all_passes_rows_through() {
        let store = VecStore::default();
        store.append(Amount::parse("10").unwrap()).unwrap();
        store.append(Amount::parse("5").unwrap().negate()).unwrap();

        assert_eq!(store.read_all(), vec![Amount::parse("10").unwrap(), Amount::parse("5").unwrap().negate()]);
    }

    #[test]
    fn read_all_degrades_to_empty() {
        let store = VecStore { corrupt: true, ..VecStore::default() };
        store.append(Amount::parse("10").unwrap()).unwrap();

        assert!(store.load().is_err());
        assert!(store.read_all().is_empty());
    }
}
