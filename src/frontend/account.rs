use crate::backend::{self, LedgerStore};
use crate::core::{Amount, Balance, Ledger};

/// The single account kept in a ledger store.
pub struct Account<S> {
    store: S
}

impl<S: LedgerStore> Account<S> {
    pub fn new(store: S) -> Account<S> {
        Account { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn deposit(&self, amount: Amount) -> backend::Result<()> {
        self.store.append(amount)
    }

    /// Stored as the negated amount.
    pub fn withdraw(&self, amount: Amount) -> backend::Result<()> {
        self.store.append(amount.negate())
    }

    pub fn ledger(&self) -> Ledger {
        Ledger::new(self.store.read_all())
    }

    pub fn balance(&self) -> Balance {
        self.ledger().balance()
    }
}
