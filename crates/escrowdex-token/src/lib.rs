//! # escrowdex-token
//!
//! Reference fungible asset implementing [`FungibleAsset`]: fixed supply
//! minted to the deployer, `transfer`, `approve`/`allowance`, and
//! delegated `transfer_from`. The exchange only sees the trait; this crate
//! exists so the ledger can be driven end to end.
//!
//! [`FungibleAsset`]: escrowdex_types::FungibleAsset

pub mod token;

pub use token::Token;
