//! Events emitted by the exchange and by fungible assets.
//!
//! Events are immutable records appended to a log only after the state
//! mutation they describe has committed. A failed operation emits nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, Amount, Order, OrderId};

/// Funds credited to a user's escrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub asset: Address,
    pub user: Address,
    pub amount: Amount,
    /// The user's escrowed balance after the deposit.
    pub balance: Amount,
}

/// Funds released from a user's escrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdraw {
    pub asset: Address,
    pub user: Address,
    pub amount: Amount,
    /// The user's escrowed balance after the withdrawal.
    pub balance: Amount,
}

/// A new resting order. `timestamp` is the order's creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub id: OrderId,
    pub user: Address,
    pub asset_wanted: Address,
    pub amount_wanted: Amount,
    pub asset_offered: Address,
    pub amount_offered: Amount,
    pub timestamp: DateTime<Utc>,
}

impl OrderPlaced {
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id,
            user: order.owner,
            asset_wanted: order.asset_wanted,
            amount_wanted: order.amount_wanted,
            asset_offered: order.asset_offered,
            amount_offered: order.amount_offered,
            timestamp: order.created_at,
        }
    }
}

/// An order cancelled by its owner. `timestamp` is the cancellation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub id: OrderId,
    pub user: Address,
    pub asset_wanted: Address,
    pub amount_wanted: Amount,
    pub asset_offered: Address,
    pub amount_offered: Amount,
    pub timestamp: DateTime<Utc>,
}

impl OrderCancelled {
    #[must_use]
    pub fn from_order(order: &Order, cancelled_at: DateTime<Utc>) -> Self {
        Self {
            id: order.id,
            user: order.owner,
            asset_wanted: order.asset_wanted,
            amount_wanted: order.amount_wanted,
            asset_offered: order.asset_offered,
            amount_offered: order.amount_offered,
            timestamp: cancelled_at,
        }
    }
}

/// Enum wrapper for all exchange events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "args")]
pub enum ExchangeEvent {
    Deposit(Deposit),
    Withdraw(Withdraw),
    Order(OrderPlaced),
    Cancel(OrderCancelled),
}

impl ExchangeEvent {
    /// Event name as it appears in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit(_) => "Deposit",
            Self::Withdraw(_) => "Withdraw",
            Self::Order(_) => "Order",
            Self::Cancel(_) => "Cancel",
        }
    }
}

/// Events emitted by a fungible asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "args")]
pub enum TokenEvent {
    Transfer {
        from: Address,
        to: Address,
        value: Amount,
    },
    Approval {
        owner: Address,
        spender: Address,
        value: Amount,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_placed_mirrors_order() {
        let order = Order::dummy(1, Address::derive("alice"));
        let event = OrderPlaced::from_order(&order);
        assert_eq!(event.id, order.id);
        assert_eq!(event.user, order.owner);
        assert_eq!(event.asset_wanted, order.asset_wanted);
        assert_eq!(event.amount_wanted, order.amount_wanted);
        assert_eq!(event.asset_offered, order.asset_offered);
        assert_eq!(event.amount_offered, order.amount_offered);
        assert_eq!(event.timestamp, order.created_at);
    }

    #[test]
    fn order_cancelled_carries_cancel_time() {
        let order = Order::dummy(2, Address::derive("alice"));
        let at = order.created_at + chrono::Duration::seconds(5);
        let event = OrderCancelled::from_order(&order, at);
        assert_eq!(event.id, OrderId(2));
        assert_eq!(event.timestamp, at);
    }

    #[test]
    fn exchange_event_names() {
        let event = ExchangeEvent::Deposit(Deposit {
            asset: crate::NATIVE_ASSET,
            user: Address::derive("alice"),
            amount: Amount::ether(1),
            balance: Amount::ether(1),
        });
        assert_eq!(event.name(), "Deposit");
    }

    #[test]
    fn exchange_event_json_is_tagged() {
        let event = ExchangeEvent::Withdraw(Withdraw {
            asset: Address::derive("token"),
            user: Address::derive("alice"),
            amount: Amount::new(3),
            balance: Amount::new(7),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "Withdraw");
        assert_eq!(json["args"]["balance"], 7);
        let back: ExchangeEvent = serde_json::from_value(json).unwrap();
        assert_eq!(event, back);
    }
}
