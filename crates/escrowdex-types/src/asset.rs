//! Fungible-asset capability consumed by the exchange.
//!
//! The exchange never implements token accounting itself. It holds a
//! [`SharedAsset`] per registered token address and drives it through
//! this trait. Every mutating call is fallible and must leave the asset
//! unchanged when it fails.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Address, Amount, Result};

/// Balance / allowance / transfer semantics of an ERC20-like asset.
///
/// `caller` is the identity on whose behalf a call is made; the asset
/// trusts it the way a contract trusts `msg.sender`.
pub trait FungibleAsset {
    /// The asset's own contract address.
    fn address(&self) -> Address;

    /// Decimal places of the smallest unit.
    fn decimals(&self) -> u32;

    fn balance_of(&self, owner: &Address) -> Amount;

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Move `amount` from `caller` to `to`.
    fn transfer(&mut self, caller: Address, to: Address, amount: Amount) -> Result<()>;

    /// Authorize `spender` to pull up to `amount` from `caller`.
    fn approve(&mut self, caller: Address, spender: Address, amount: Amount) -> Result<()>;

    /// Move `amount` from `from` to `to` using `spender`'s allowance.
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()>;
}

/// A fungible asset shared between its holders and the exchange.
pub type SharedAsset = Arc<Mutex<dyn FungibleAsset + Send>>;

/// Wrap a concrete asset for sharing.
pub fn share<A: FungibleAsset + Send + 'static>(asset: A) -> SharedAsset {
    Arc::new(Mutex::new(asset))
}
