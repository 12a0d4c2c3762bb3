//! Unit-price check and the accumulated treasury balance.

use vetmint_types::Amount;

use crate::{LedgerError, Result};

/// An accepted payment, ready to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    /// Amount attached to the operation.
    pub paid: Amount,
    /// Treasury balance once settled.
    pub balance_after: Amount,
}

/// Treasury that collects issuance payments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentGate {
    balance: Amount,
}

impl PaymentGate {
    /// Create a gate with an empty treasury.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gate holding an existing balance.
    pub fn with_balance(balance: Amount) -> Self {
        Self { balance }
    }

    /// Amount due for a batch: `unit_price * batch_size`.
    pub fn required(unit_price: Amount, batch_size: u64) -> Result<Amount> {
        unit_price
            .checked_mul(Amount::from(batch_size))
            .ok_or(LedgerError::Overflow("payment amount"))
    }

    /// Accept `payment` for a batch of `batch_size`.
    ///
    /// Exempt callers skip the price check; whatever they attach is still
    /// credited.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientPayment`] if `payment < unit_price * batch_size`
    /// - [`LedgerError::Overflow`] if the amount due or the new balance overflows
    pub fn accept(
        &self,
        unit_price: Amount,
        batch_size: u64,
        payment: Amount,
        exempt: bool,
    ) -> Result<Receipt> {
        if !exempt {
            let required = Self::required(unit_price, batch_size)?;
            if payment < required {
                return Err(LedgerError::InsufficientPayment {
                    required,
                    paid: payment,
                });
            }
        }
        let balance_after = self
            .balance
            .checked_add(payment)
            .ok_or(LedgerError::Overflow("treasury balance"))?;
        Ok(Receipt {
            paid: payment,
            balance_after,
        })
    }

    /// Credit an accepted payment.
    pub fn settle(&mut self, receipt: Receipt) {
        self.balance = receipt.balance_after;
    }

    /// Current treasury balance.
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Empty the treasury, returning what it held.
    pub fn withdraw(&mut self) -> Amount {
        std::mem::take(&mut self.balance)
    }
}
