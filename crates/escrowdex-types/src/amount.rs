//! Asset amounts in smallest units.
//!
//! Ledger arithmetic is integer-only: an [`Amount`] can never be negative and
//! every add/sub is checked. Conversion to and from whole units (e.g.
//! `10 tokens` ↔ `10 * 10^18`) goes through [`Decimal`] so fractional inputs
//! such as `0.5 ETH` are exact.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EscrowdexError, Result, constants};

/// Non-negative integer amount, denominated in an asset's smallest unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(pub u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u128 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// `whole * 10^decimals`. Infallible for 18 decimals since
    /// `u64::MAX * 10^18` fits in a `u128`.
    #[must_use]
    pub fn from_whole(whole: u64, decimals: u32) -> Option<Self> {
        10u128
            .checked_pow(decimals)
            .and_then(|scale| u128::from(whole).checked_mul(scale))
            .map(Self)
    }

    /// `n` whole units of an 18-decimal asset (Ether, or a standard token).
    #[must_use]
    pub fn ether(n: u64) -> Self {
        Self(u128::from(n) * 10u128.pow(constants::NATIVE_DECIMALS))
    }

    /// Alias of [`Amount::ether`] for 18-decimal tokens.
    #[must_use]
    pub fn tokens(n: u64) -> Self {
        Self::ether(n)
    }

    /// Convert a (possibly fractional) whole-unit quantity to smallest units.
    ///
    /// # Errors
    /// `InvalidAmount` if `units` is negative, has more fractional digits
    /// than `decimals`, or does not fit.
    pub fn from_units(units: Decimal, decimals: u32) -> Result<Self> {
        let units = units.normalize();
        if units.is_sign_negative() && !units.is_zero() {
            return Err(EscrowdexError::InvalidAmount {
                reason: format!("{units} is negative"),
            });
        }
        let scale = units.scale();
        if scale > decimals {
            return Err(EscrowdexError::InvalidAmount {
                reason: format!("{units} has more than {decimals} fractional digits"),
            });
        }
        let mantissa = units.mantissa().unsigned_abs();
        10u128
            .checked_pow(decimals - scale)
            .and_then(|factor| mantissa.checked_mul(factor))
            .map(Self)
            .ok_or_else(|| EscrowdexError::InvalidAmount {
                reason: format!("{units} overflows at {decimals} decimals"),
            })
    }

    /// Express this amount in whole units with `decimals` fractional digits.
    ///
    /// # Errors
    /// `InvalidAmount` if the value exceeds the 96-bit decimal mantissa or
    /// `decimals` exceeds the maximum decimal scale.
    pub fn to_units(self, decimals: u32) -> Result<Decimal> {
        let raw = i128::try_from(self.0).map_err(|_| EscrowdexError::InvalidAmount {
            reason: format!("{self} out of decimal range"),
        })?;
        Decimal::try_from_i128_with_scale(raw, decimals)
            .map(|d| d.normalize())
            .map_err(|e| EscrowdexError::InvalidAmount {
                reason: format!("{self} at {decimals} decimals: {e}"),
            })
    }
}

impl From<u128> for Amount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl From<u64> for Amount {
    fn from(raw: u64) -> Self {
        Self(u128::from(raw))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
