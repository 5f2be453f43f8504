//! Escrowed balance accounting.
//!
//! Tracks per-(asset, owner) balances in smallest units. Every mutation
//! validates first, runs the external custody step (if any), and writes
//! last: if either the check or the custody step fails, the balance is
//! unchanged.

use std::collections::HashMap;

use escrowdex_types::{Address, Amount, EscrowdexError, Result};

/// Per-(asset, owner) escrow balances.
///
/// The ledger is the source of truth for what each user may withdraw.
/// Placing or cancelling orders never touches it.
#[derive(Debug, Default)]
pub struct BalanceLedger {
    balances: HashMap<(Address, Address), Amount>,
}

impl BalanceLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Credit `amount` with no external custody step.
    ///
    /// # Errors
    /// `BalanceOverflow` if the new balance does not fit.
    pub fn deposit(&mut self, asset: Address, owner: Address, amount: Amount) -> Result<Amount> {
        self.deposit_with(asset, owner, amount, || Ok(()))
    }

    /// Credit `amount` after `pull` has moved the funds into custody.
    ///
    /// `pull` runs only once the credit is known to fit, and the balance is
    /// written only if `pull` succeeds. Returns the new balance.
    pub fn deposit_with<F>(
        &mut self,
        asset: Address,
        owner: Address,
        amount: Amount,
        pull: F,
    ) -> Result<Amount>
    where
        F: FnOnce() -> Result<()>,
    {
        let new_balance = self
            .balance_of(asset, owner)
            .checked_add(amount)
            .ok_or(EscrowdexError::BalanceOverflow)?;
        pull()?;
        self.balances.insert((asset, owner), new_balance);
        Ok(new_balance)
    }

    /// Debit `amount` with no external custody step.
    ///
    /// # Errors
    /// `InsufficientBalance` if the balance is below `amount`.
    pub fn withdraw(&mut self, asset: Address, owner: Address, amount: Amount) -> Result<Amount> {
        self.withdraw_with(asset, owner, amount, || Ok(()))
    }

    /// Debit `amount`, releasing it from custody through `push`.
    ///
    /// `push` runs only once the balance is known to cover `amount`, and
    /// the balance is written only if `push` succeeds. Returns the new
    /// balance.
    pub fn withdraw_with<F>(
        &mut self,
        asset: Address,
        owner: Address,
        amount: Amount,
        push: F,
    ) -> Result<Amount>
    where
        F: FnOnce() -> Result<()>,
    {
        let available = self.balance_of(asset, owner);
        let new_balance =
            available
                .checked_sub(amount)
                .ok_or(EscrowdexError::InsufficientBalance {
                    needed: amount,
                    available,
                })?;
        push()?;
        self.balances.insert((asset, owner), new_balance);
        Ok(new_balance)
    }

    /// Balance of `owner` in `asset`; zero if never touched.
    #[must_use]
    pub fn balance_of(&self, asset: Address, owner: Address) -> Amount {
        self.balances
            .get(&(asset, owner))
            .copied()
            .unwrap_or_default()
    }

    /// Sum of every owner's balance in `asset`.
    ///
    /// # Errors
    /// `BalanceOverflow` if the sum does not fit.
    pub fn total_held(&self, asset: Address) -> Result<Amount> {
        self.balances
            .iter()
            .filter(|((a, _), _)| *a == asset)
            .try_fold(Amount::ZERO, |acc, (_, amount)| {
                acc.checked_add(*amount)
            })
            .ok_or(EscrowdexError::BalanceOverflow)
    }
}
