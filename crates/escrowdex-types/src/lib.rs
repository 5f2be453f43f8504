//! # escrowdex-types
//!
//! Shared types, errors, and configuration for the **escrowdex** custodial
//! exchange ledger.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`OrderId`], and the [`NATIVE_ASSET`] sentinel
//! - **Amounts**: [`Amount`] in smallest units, with whole-unit conversion
//! - **Fungible-asset capability**: [`FungibleAsset`], [`SharedAsset`]
//! - **Order model**: [`Order`], [`OrderStatus`]
//! - **Events**: [`ExchangeEvent`] and its payloads, [`TokenEvent`]
//! - **Configuration**: [`ExchangeConfig`], [`TokenConfig`]
//! - **Errors**: [`EscrowdexError`] with `DX_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod amount;
pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod order;

// Re-export all primary types at crate root for ergonomic imports:
//   use escrowdex_types::{Address, Amount, Order, ExchangeEvent, ...};

pub use amount::*;
pub use asset::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use order::*;

// Constants are accessed via `escrowdex_types::constants::FOO`
// (not re-exported to avoid name collisions).
