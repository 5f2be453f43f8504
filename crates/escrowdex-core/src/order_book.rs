//! Resting order storage and lifecycle.
//!
//! Orders get sequential ids starting at 1. The counter never goes back,
//! not even after cancellation. The only transition is Open → Cancelled,
//! and only the order's owner may make it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use escrowdex_types::constants::FIRST_ORDER_ID;
use escrowdex_types::{Address, Amount, EscrowdexError, Order, OrderId, Result};

/// Order records plus the id counter.
#[derive(Debug, Default)]
pub struct OrderBookState {
    /// Orders keyed by id (ascending = creation order).
    orders: BTreeMap<OrderId, Order>,
    /// Id of the most recently created order; 0 before the first.
    order_count: u64,
}

impl OrderBookState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: BTreeMap::new(),
            order_count: FIRST_ORDER_ID - 1,
        }
    }

    /// Store a new open order created at `now` and return its id.
    ///
    /// No funds are checked or reserved, and zero amounts are accepted.
    ///
    /// # Errors
    /// `OrderIdExhausted` if the counter is at `u64::MAX`.
    pub fn make_order(
        &mut self,
        owner: Address,
        asset_wanted: Address,
        amount_wanted: Amount,
        asset_offered: Address,
        amount_offered: Amount,
        now: DateTime<Utc>,
    ) -> Result<&Order> {
        let id = OrderId(self.order_count)
            .checked_next()
            .ok_or(EscrowdexError::OrderIdExhausted)?;
        let order = Order {
            id,
            owner,
            asset_wanted,
            amount_wanted,
            asset_offered,
            amount_offered,
            created_at: now,
            cancelled: false,
        };
        self.order_count = id.get();
        Ok(self.orders.entry(id).or_insert(order))
    }

    /// Mark an order cancelled on behalf of `caller`.
    ///
    /// Cancelling an already-cancelled order again succeeds and leaves it
    /// cancelled.
    ///
    /// # Errors
    /// - `OrderNotFound` if `id` was never issued
    /// - `Unauthorized` if `caller` is not the owner
    pub fn cancel_order(&mut self, id: OrderId, caller: Address) -> Result<&Order> {
        let order = self
            .orders
            .get_mut(&id)
            .ok_or(EscrowdexError::OrderNotFound(id))?;
        if !order.is_owned_by(&caller) {
            return Err(EscrowdexError::Unauthorized { caller, order: id });
        }
        order.cancelled = true;
        Ok(order)
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// Whether `id` exists and is cancelled.
    #[must_use]
    pub fn is_cancelled(&self, id: OrderId) -> bool {
        self.orders.get(&id).is_some_and(|o| o.cancelled)
    }

    /// Number of orders ever created (= id of the latest one).
    #[must_use]
    pub fn order_count(&self) -> u64 {
        self.order_count
    }

    /// Orders still open, in id order.
    pub fn open_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values().filter(|o| o.is_open())
    }

    /// Every order created by `owner`, in id order.
    pub fn orders_of(&self, owner: Address) -> impl Iterator<Item = &Order> {
        self.orders.values().filter(move |o| o.owner == owner)
    }
}
