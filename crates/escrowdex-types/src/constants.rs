//! System-wide constants for the escrowdex ledger.

/// Decimal places of the native asset (wei per Ether).
pub const NATIVE_DECIMALS: u32 = 18;

/// Upper bound (inclusive) of the configurable fee percentage.
pub const MAX_FEE_PERCENT: u8 = 100;

/// Id assigned to the first order; the counter starts one below.
pub const FIRST_ORDER_ID: u64 = 1;

/// Reference token: default name.
pub const DEFAULT_TOKEN_NAME: &str = "My Name";

/// Reference token: default symbol.
pub const DEFAULT_TOKEN_SYMBOL: &str = "DAPP";

/// Reference token: default decimals.
pub const DEFAULT_TOKEN_DECIMALS: u32 = 18;

/// Reference token: default total supply in whole tokens.
pub const DEFAULT_TOKEN_SUPPLY_WHOLE: u64 = 1_000_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "escrowdex";
