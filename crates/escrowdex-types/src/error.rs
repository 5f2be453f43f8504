//! Error types for the escrowdex ledger.
//!
//! All errors use the `DX_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Asset path / amount errors
//! - 2xx: Balance and allowance errors
//! - 3xx: Order errors
//! - 4xx: Access errors
//! - 5xx: Fungible-asset (token) errors
//! - 8xx: Invariant errors
//! - 9xx: Configuration / serialization errors

use thiserror::Error;

use crate::{Address, Amount, OrderId};

/// Central error enum for all escrowdex operations.
///
/// Every failure aborts the whole operation: no balance, order, or event
/// is changed when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowdexError {
    // =================================================================
    // Asset Path / Amount Errors (1xx)
    // =================================================================
    /// The native-asset sentinel was used on a fungible-asset path.
    #[error("DX_ERR_100: Wrong asset path: native asset not allowed in {operation}")]
    WrongAssetPath { operation: &'static str },

    /// A fungible deposit of zero.
    #[error("DX_ERR_101: Amount must be non-zero")]
    ZeroAmount,

    /// An amount could not be represented (negative, too precise, overflow).
    #[error("DX_ERR_102: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// No fungible asset is registered under this address.
    #[error("DX_ERR_103: Unknown asset: {0}")]
    UnknownAsset(Address),

    /// A fungible asset is already registered under this address.
    #[error("DX_ERR_104: Asset already registered: {0}")]
    DuplicateAsset(Address),

    /// Not a 20-byte hex address.
    #[error("DX_ERR_105: Invalid address: {input}")]
    InvalidAddress { input: String },

    // =================================================================
    // Balance / Allowance Errors (2xx)
    // =================================================================
    /// Withdrawal exceeds the escrowed balance.
    #[error("DX_ERR_200: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// The fungible asset declined the delegated transfer into custody.
    #[error("DX_ERR_201: Insufficient allowance: need {needed}, allowed {allowance}")]
    InsufficientAllowance { needed: Amount, allowance: Amount },

    /// A balance would exceed the representable maximum.
    #[error("DX_ERR_202: Balance overflow")]
    BalanceOverflow,

    // =================================================================
    // Order Errors (3xx)
    // =================================================================
    /// The requested order does not exist.
    #[error("DX_ERR_300: Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order counter cannot advance any further.
    #[error("DX_ERR_301: Order id space exhausted")]
    OrderIdExhausted,

    // =================================================================
    // Access Errors (4xx)
    // =================================================================
    /// The caller is not the owner of the order.
    #[error("DX_ERR_400: Unauthorized: {caller} does not own {order}")]
    Unauthorized { caller: Address, order: OrderId },

    /// Native value was sent outside the deposit entry point.
    #[error("DX_ERR_401: Direct transfer of {value} rejected; use deposit_ether")]
    DirectTransferRejected { value: Amount },

    // =================================================================
    // Fungible-Asset Errors (5xx)
    // =================================================================
    /// The holder's token balance is too small for the transfer.
    #[error("DX_ERR_500: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Amount, available: Amount },

    /// Transfer or approval targeting the zero address.
    #[error("DX_ERR_501: Invalid recipient: zero address")]
    InvalidRecipient,

    /// The fungible asset refused to release custody.
    #[error("DX_ERR_502: Asset transfer rejected: {reason}")]
    TransferRejected { reason: String },

    // =================================================================
    // Invariant Errors (8xx)
    // =================================================================
    /// Ledger totals disagree with recorded deposits/withdrawals or custody.
    #[error("DX_ERR_800: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Configuration (9xx)
    // =================================================================
    /// Serialization / deserialization error.
    #[error("DX_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (malformed config, missing fields, etc.).
    #[error("DX_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// Fee percent outside `0..=100`.
    #[error("DX_ERR_903: Invalid fee percent {fee_percent}: must be at most 100")]
    InvalidFeePercent { fee_percent: u8 },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, EscrowdexError>;

impl From<serde_json::Error> for EscrowdexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
