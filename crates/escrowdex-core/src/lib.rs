//! # escrowdex-core
//!
//! Custodial exchange ledger for the **escrowdex** workspace.
//!
//! This crate provides:
//!
//! - [`BalanceLedger`]: per-(asset, owner) escrowed balances with atomic
//!   check → custody step → write sequencing
//! - [`OrderBookState`]: resting orders with sequential ids and owner-only
//!   cancellation
//! - [`AssetRegistry`]: fungible assets the exchange can take custody of
//! - [`SupplyConservation`]: per-asset deposit/withdrawal totals checked
//!   against the ledger
//! - [`Exchange`]: the public operation surface and sole event emitter
//! - [`SharedExchange`]: cloneable thread-safe handle
//!
//! ## Operation flow
//!
//! ```text
//! caller ──▶ Exchange ──▶ validate ──▶ BalanceLedger | OrderBookState ──▶ event
//!                              │                │
//!                              ▼                ▼
//!                       (reject, no      FungibleAsset
//!                        side effect)   transfer / transfer_from
//! ```
//!
//! Placing or cancelling an order never moves funds. Only deposits and
//! withdrawals touch the ledger.

pub mod balance_ledger;
pub mod exchange;
pub mod order_book;
pub mod registry;
pub mod shared;
pub mod supply_conservation;

pub use balance_ledger::BalanceLedger;
pub use exchange::Exchange;
pub use order_book::OrderBookState;
pub use registry::AssetRegistry;
pub use shared::SharedExchange;
pub use supply_conservation::SupplyConservation;
