use std::fmt;

use bigdecimal::Zero;

use crate::core::amount::Amount;

/// Adds up `transactions` in order; an empty ledger sums to zero.
pub fn sum(transactions: &[Amount]) -> Amount {
    transactions.iter().fold(Amount::zero(), |total, amount| total + amount)
}

/// The ordered transactions of the account, as last read from storage.
#[derive(Debug, Default, PartialEq)]
pub struct Ledger {
    transactions: Vec<Amount>
}

impl Ledger {
    pub fn new(transactions: Vec<Amount>) -> Ledger {
        return Ledger { transactions };
    }

    pub fn transactions(&self) -> &[Amount] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Recomputed from every transaction on each call, nothing is cached.
    pub fn balance(&self) -> Balance {
        return Balance(sum(&self.transactions));
    }
}

/// Account balance, displayed as `$12.30` or `-$12.30`.
///
/// Cents are rounded half away from zero. A total that rounds to zero
/// is shown without a sign.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Balance(pub Amount);

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.0.cents_magnitude();
        let sign = if self.0.is_negative() && !cents.is_zero() { "-" } else { "" };
        write!(f, "{}${}", sign, cents)
    }
}
