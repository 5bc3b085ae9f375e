//! Fixed-point token amounts.
//!
//! The ledger represents token amounts as 18-decimal fixed-point integers;
//! humans enter decimal strings. This module is the single conversion boundary
//! between the two — no other module performs scale arithmetic.

use std::fmt;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Fixed-point scale of the ledger representation.
pub const DECIMALS: usize = 18;

/// 10^18, one whole token in base units.
const ONE_TOKEN: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// A non-negative token amount in 18-decimal base units.
///
/// `parse` and `to_display` round-trip exactly for canonical decimal strings
/// (no sign, no trailing fractional zeros, no trailing dot).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Self = Amount(U256::ZERO);

    /// Wrap a wire-form base-unit value.
    pub fn from_base_units(units: U256) -> Self {
        Amount(units)
    }

    /// The wire-form base-unit value.
    pub fn base_units(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Parse a human-entered decimal string into base units.
    ///
    /// Zero is a valid balance; use [`Amount::parse_positive`] for transaction
    /// amounts.
    pub fn parse(text: &str) -> EngineResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }
        if text.starts_with('-') || text.starts_with('+') {
            return Err(EngineError::InvalidAmount(format!(
                "'{text}' must be an unsigned decimal"
            )));
        }

        let (whole, frac) = match text.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (text, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(EngineError::InvalidAmount(format!("'{text}' is not a number")));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(EngineError::InvalidAmount(format!("'{text}' is not a number")));
        }
        if frac.len() > DECIMALS {
            return Err(EngineError::InvalidAmount(format!(
                "'{text}' has more than {DECIMALS} decimal places"
            )));
        }

        let whole_units = if whole.is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(whole, 10)
                .ok()
                .and_then(|w| w.checked_mul(ONE_TOKEN))
                .ok_or_else(|| EngineError::InvalidAmount(format!("'{text}' is too large")))?
        };

        let frac_units = if frac.is_empty() {
            U256::ZERO
        } else {
            // "5" at scale 18 means 5 * 10^17: pad to the full scale width.
            let mut padded = frac.to_string();
            padded.push_str(&"0".repeat(DECIMALS - frac.len()));
            U256::from_str_radix(&padded, 10)
                .map_err(|_| EngineError::InvalidAmount(format!("'{text}' is not a number")))?
        };

        whole_units
            .checked_add(frac_units)
            .map(Amount)
            .ok_or_else(|| EngineError::InvalidAmount(format!("'{text}' is too large")))
    }

    /// Parse a transaction amount; rejects zero in addition to everything
    /// [`Amount::parse`] rejects.
    pub fn parse_positive(text: &str) -> EngineResult<Self> {
        let amount = Self::parse(text)?;
        if amount.is_zero() {
            return Err(EngineError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        Ok(amount)
    }

    /// Canonical decimal display form: no trailing fractional zeros, no
    /// trailing dot.
    pub fn to_display(&self) -> String {
        let whole = self.0 / ONE_TOKEN;
        let frac = self.0 % ONE_TOKEN;
        if frac.is_zero() {
            return whole.to_string();
        }
        let digits = format!("{:0>width$}", frac.to_string(), width = DECIMALS);
        format!("{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_display()
    }
}

impl TryFrom<String> for Amount {
    type Error = EngineError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Amount::parse(&text)
    }
}
