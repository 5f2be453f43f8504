//! Configuration types for the exchange and the reference token.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, EscrowdexError, Result, constants};

/// Exchange construction parameters. Immutable once the exchange exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Account that collects trading fees.
    pub fee_account: Address,
    /// Fee percentage, `0..=100`.
    pub fee_percent: u8,
}

impl ExchangeConfig {
    /// Build and validate a config.
    ///
    /// # Errors
    /// `InvalidFeePercent` if `fee_percent > 100`.
    pub fn new(fee_account: Address, fee_percent: u8) -> Result<Self> {
        let cfg = Self {
            fee_account,
            fee_percent,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fee_percent > constants::MAX_FEE_PERCENT {
            return Err(EscrowdexError::InvalidFeePercent {
                fee_percent: self.fee_percent,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config, e.g.
    /// `{"fee_account":"0x…","fee_percent":10}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Deployment parameters of the reference token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    /// Total supply in smallest units, minted to the deployer.
    pub total_supply: Amount,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: constants::DEFAULT_TOKEN_NAME.to_string(),
            symbol: constants::DEFAULT_TOKEN_SYMBOL.to_string(),
            decimals: constants::DEFAULT_TOKEN_DECIMALS,
            total_supply: Amount::tokens(constants::DEFAULT_TOKEN_SUPPLY_WHOLE),
        }
    }
}

impl TokenConfig {
    /// A token with `supply_whole` whole units at `decimals`.
    ///
    /// # Errors
    /// `InvalidAmount` if the supply does not fit.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u32,
        supply_whole: u64,
    ) -> Result<Self> {
        let total_supply = Amount::from_whole(supply_whole, decimals).ok_or_else(|| {
            EscrowdexError::InvalidAmount {
                reason: format!("supply {supply_whole} overflows at {decimals} decimals"),
            }
        })?;
        Ok(Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            total_supply,
        })
    }
}
