//! Thread-safe handle to an [`Exchange`].
//!
//! Every operation takes the lock for exactly one call, so operations from
//! different threads are serialized and never interleave. The exchange lock
//! is always taken before any asset lock.

use std::sync::Arc;

use escrowdex_types::{
    Address, Amount, Deposit, OrderCancelled, OrderId, OrderPlaced, Result, SharedAsset, Withdraw,
};
use parking_lot::Mutex;

use crate::exchange::Exchange;

/// Cloneable, `Send + Sync` handle to one exchange.
#[derive(Clone)]
pub struct SharedExchange {
    inner: Arc<Mutex<Exchange>>,
}

impl SharedExchange {
    #[must_use]
    pub fn new(exchange: Exchange) -> Self {
        Self {
            inner: Arc::new(Mutex::new(exchange)),
        }
    }

    pub fn register_asset(&self, asset: SharedAsset) -> Result<Address> {
        self.inner.lock().register_asset(asset)
    }

    pub fn deposit_token(&self, asset: Address, amount: Amount, caller: Address) -> Result<Deposit> {
        self.inner.lock().deposit_token(asset, amount, caller)
    }

    pub fn deposit_ether(&self, caller: Address, value: Amount) -> Result<Deposit> {
        self.inner.lock().deposit_ether(caller, value)
    }

    pub fn withdraw_token(&self, asset: Address, amount: Amount, caller: Address) -> Result<Withdraw> {
        self.inner.lock().withdraw_token(asset, amount, caller)
    }

    pub fn withdraw_ether(&self, amount: Amount, caller: Address) -> Result<Withdraw> {
        self.inner.lock().withdraw_ether(amount, caller)
    }

    pub fn direct_transfer(&self, caller: Address, value: Amount) -> Result<()> {
        self.inner.lock().direct_transfer(caller, value)
    }

    pub fn make_order(
        &self,
        asset_wanted: Address,
        amount_wanted: Amount,
        asset_offered: Address,
        amount_offered: Amount,
        caller: Address,
    ) -> Result<OrderPlaced> {
        self.inner.lock().make_order(
            asset_wanted,
            amount_wanted,
            asset_offered,
            amount_offered,
            caller,
        )
    }

    pub fn cancel_order(&self, id: OrderId, caller: Address) -> Result<OrderCancelled> {
        self.inner.lock().cancel_order(id, caller)
    }

    #[must_use]
    pub fn balance_of(&self, asset: Address, owner: Address) -> Amount {
        self.inner.lock().balance_of(asset, owner)
    }

    pub fn balance_of_token(&self, asset: Address, owner: Address) -> Result<Amount> {
        self.inner.lock().balance_of_token(asset, owner)
    }

    #[must_use]
    pub fn balance_of_ether(&self, owner: Address) -> Amount {
        self.inner.lock().balance_of_ether(owner)
    }

    /// Run `f` against a consistent snapshot of the exchange.
    pub fn read<R>(&self, f: impl FnOnce(&Exchange) -> R) -> R {
        f(&self.inner.lock())
    }
}

impl std::fmt::Debug for SharedExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedExchange")
            .field("exchange", &*self.inner.lock())
            .finish()
    }
}
