//! Supply conservation invariant checker.
//!
//! ```text
//! ∀ asset: Σ ledger balances == Σ deposits − Σ withdrawals
//! ```
//!
//! The exchange records every committed deposit and withdrawal here and
//! can verify the identity against the ledger at any time.

use std::collections::{BTreeSet, HashMap};

use escrowdex_types::{Address, Amount, EscrowdexError, Result};

/// Per-asset running totals of deposits and withdrawals.
#[derive(Debug, Default)]
pub struct SupplyConservation {
    deposits: HashMap<Address, Amount>,
    withdrawals: HashMap<Address, Amount>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            deposits: HashMap::new(),
            withdrawals: HashMap::new(),
        }
    }

    /// Check that a deposit of `amount` can be recorded.
    ///
    /// # Errors
    /// `BalanceOverflow` if the running total would not fit.
    pub fn check_deposit(&self, asset: Address, amount: Amount) -> Result<Amount> {
        self.total_deposits(asset)
            .checked_add(amount)
            .ok_or(EscrowdexError::BalanceOverflow)
    }

    /// Check that a withdrawal of `amount` can be recorded.
    pub fn check_withdrawal(&self, asset: Address, amount: Amount) -> Result<Amount> {
        self.total_withdrawals(asset)
            .checked_add(amount)
            .ok_or(EscrowdexError::BalanceOverflow)
    }

    /// Record a committed deposit. Nothing is written on error.
    pub fn record_deposit(&mut self, asset: Address, amount: Amount) -> Result<()> {
        let total = self.check_deposit(asset, amount)?;
        self.deposits.insert(asset, total);
        Ok(())
    }

    /// Record a committed withdrawal. Nothing is written on error.
    pub fn record_withdrawal(&mut self, asset: Address, amount: Amount) -> Result<()> {
        let total = self.check_withdrawal(asset, amount)?;
        self.withdrawals.insert(asset, total);
        Ok(())
    }

    #[must_use]
    pub fn total_deposits(&self, asset: Address) -> Amount {
        self.deposits.get(&asset).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn total_withdrawals(&self, asset: Address) -> Amount {
        self.withdrawals.get(&asset).copied().unwrap_or_default()
    }

    /// Deposits minus withdrawals, or `None` if withdrawals exceed deposits.
    #[must_use]
    pub fn expected_supply(&self, asset: Address) -> Option<Amount> {
        self.total_deposits(asset)
            .checked_sub(self.total_withdrawals(asset))
    }

    /// Verify the ledger total for `asset` against the recorded flows.
    ///
    /// # Errors
    /// `SupplyInvariantViolation` if `actual_supply` ≠ deposits − withdrawals.
    pub fn verify(&self, asset: Address, actual_supply: Amount) -> Result<()> {
        let expected = self.expected_supply(asset);
        if expected != Some(actual_supply) {
            return Err(EscrowdexError::SupplyInvariantViolation {
                reason: format!(
                    "Asset {asset}: actual supply {actual_supply} != expected {} \
                     (deposits={}, withdrawals={})",
                    expected.map_or_else(|| "negative".to_string(), |e| e.to_string()),
                    self.total_deposits(asset),
                    self.total_withdrawals(asset),
                ),
            });
        }
        Ok(())
    }

    /// Every asset with recorded flows, sorted.
    #[must_use]
    pub fn tracked_assets(&self) -> Vec<Address> {
        let assets: BTreeSet<Address> = self
            .deposits
            .keys()
            .chain(self.withdrawals.keys())
            .copied()
            .collect();
        assets.into_iter().collect()
    }
}
