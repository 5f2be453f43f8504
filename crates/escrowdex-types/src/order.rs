//! Resting order types.
//!
//! An order records a willingness to exchange `amount_offered` of
//! `asset_offered` for `amount_wanted` of `asset_wanted`. Placing an order
//! reserves no funds; only deposit and withdraw move balances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, Amount, OrderId};

/// Lifecycle status of an order. There is no filled state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A resting order. Only `cancelled` ever changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner: Address,
    pub asset_wanted: Address,
    pub amount_wanted: Amount,
    pub asset_offered: Address,
    pub amount_offered: Amount,
    pub created_at: DateTime<Utc>,
    pub cancelled: bool,
}

impl Order {
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        if self.cancelled {
            OrderStatus::Cancelled
        } else {
            OrderStatus::Open
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.cancelled
    }

    #[must_use]
    pub fn is_owned_by(&self, caller: &Address) -> bool {
        self.owner == *caller
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    /// An open order offering native asset for a random token.
    pub fn dummy(id: u64, owner: Address) -> Self {
        Self {
            id: OrderId(id),
            owner,
            asset_wanted: Address::random(),
            amount_wanted: Amount::ether(2),
            asset_offered: crate::NATIVE_ASSET,
            amount_offered: Amount::ether(1),
            created_at: Utc::now(),
            cancelled: false,
        }
    }
}
