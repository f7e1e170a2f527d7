//! 18-decimal fixed-point arithmetic with explicit rounding direction
//!
//! Every operation that can lose precision comes in a `_down` and an `_up`
//! flavour. Callers pick the direction that keeps the pool from giving away
//! value: amounts paid out round down, amounts paid in round up.
//!
//! ## Design Principles
//!
//! - **Truncating semantics**: `mul_down(a, b) = floor(a·b / 10^18)`,
//!   `mul_up(a, b) = ceil(a·b / 10^18)`, and symmetrically for division
//! - **No silent wrap**: overflow, underflow and division by zero are errors
//! - **One saturating escape hatch**: [`FixedPoint::saturating_sub`] floors at zero
//!   and is only used where the on-chain reference does the same

use crate::errors::MathError;
use ethers_core::types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of decimal digits carried by [`FixedPoint`]
pub const FIXED_DECIMALS: u32 = 18;

/// Largest mantissa a `rust_decimal::Decimal` can hold (96 bits)
const DECIMAL_MANTISSA_BITS: usize = 96;

/// Maximum scale a `rust_decimal::Decimal` supports
const DECIMAL_MAX_SCALE: u32 = 28;

/// Unsigned fixed-point value with 18 decimal places
///
/// Examples:
/// - 1.0 = FixedPoint(10^18)
/// - 0.01 = FixedPoint(10^16)
/// - 1 wei = FixedPoint(1)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedPoint(pub U256);

impl FixedPoint {
    pub const ZERO: Self = Self(U256([0, 0, 0, 0]));

    /// 1.0 in fixed-point representation (10^18)
    pub const ONE: Self = Self(U256([1_000_000_000_000_000_000, 0, 0, 0]));

    /// Create from a raw scaled integer
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Get the raw scaled integer
    pub fn raw(self) -> U256 {
        self.0
    }

    /// Create from a whole number of units
    pub fn from_integer(units: u64) -> Self {
        // u64 * 10^18 is far below 2^256
        Self(U256::from(units) * Self::ONE.0)
    }

    /// Parse a non-negative decimal string, truncating digits past the 18th decimal
    ///
    /// ```
    /// use boosted_amm::FixedPoint;
    ///
    /// let fee = FixedPoint::from_decimal_str("0.01").unwrap();
    /// assert_eq!(fee.raw().as_u64(), 10_000_000_000_000_000);
    /// ```
    pub fn from_decimal_str(s: &str) -> Result<Self, MathError> {
        parse_units(s, FIXED_DECIMALS).map(Self)
    }

    /// Convert a `Decimal` into fixed-point, truncating past 18 decimals
    pub fn from_decimal(value: Decimal) -> Result<Self, MathError> {
        decimal_to_units(value, FIXED_DECIMALS).map(Self)
    }

    /// Convert to `Decimal` for display or ranking heuristics
    ///
    /// Fails when the raw value does not fit in a 96-bit mantissa.
    pub fn to_decimal(self) -> Result<Decimal, MathError> {
        units_to_decimal(self.0, FIXED_DECIMALS)
    }

    /// Upscale an amount in native token units to 18 decimals
    pub fn from_native(amount: U256, decimals: u32) -> Result<Self, MathError> {
        if decimals <= FIXED_DECIMALS {
            amount
                .checked_mul(pow10(FIXED_DECIMALS - decimals)?)
                .map(Self)
                .ok_or(MathError::Overflow { op: "from_native" })
        } else {
            Ok(Self(amount / pow10(decimals - FIXED_DECIMALS)?))
        }
    }

    /// Downscale to native token units, rounding down
    pub fn to_native_down(self, decimals: u32) -> Result<U256, MathError> {
        if decimals <= FIXED_DECIMALS {
            Ok(self.0 / pow10(FIXED_DECIMALS - decimals)?)
        } else {
            self.0
                .checked_mul(pow10(decimals - FIXED_DECIMALS)?)
                .ok_or(MathError::Overflow { op: "to_native_down" })
        }
    }

    /// Drop precision beyond `decimals`, rounding toward zero
    pub fn round_down_to_decimals(self, decimals: u32) -> Self {
        if decimals >= FIXED_DECIMALS {
            return self;
        }
        // at most 10^18
        let unit = U256::exp10((FIXED_DECIMALS - decimals) as usize);
        Self(self.0 - self.0 % unit)
    }

    /// Drop precision beyond `decimals`, rounding away from zero
    pub fn round_up_to_decimals(self, decimals: u32) -> Result<Self, MathError> {
        if decimals >= FIXED_DECIMALS {
            return Ok(self);
        }
        let unit = pow10(FIXED_DECIMALS - decimals)?;
        let remainder = self.0 % unit;
        if remainder.is_zero() {
            return Ok(self);
        }
        (self.0 - remainder)
            .checked_add(unit)
            .map(Self)
            .ok_or(MathError::Overflow {
                op: "round_up_to_decimals",
            })
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition
    pub fn add(self, rhs: Self) -> Result<Self, MathError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(MathError::Overflow { op: "add" })
    }

    /// Checked subtraction - a negative result is an error
    pub fn sub(self, rhs: Self) -> Result<Self, MathError> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(MathError::Underflow { op: "sub" })
    }

    /// Saturating subtraction - clamps to zero instead of underflowing
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// `floor(self · rhs / 10^18)`
    pub fn mul_down(self, rhs: Self) -> Result<Self, MathError> {
        let product = self
            .0
            .checked_mul(rhs.0)
            .ok_or(MathError::Overflow { op: "mul_down" })?;
        Ok(Self(product / Self::ONE.0))
    }

    /// `ceil(self · rhs / 10^18)`
    pub fn mul_up(self, rhs: Self) -> Result<Self, MathError> {
        let product = self
            .0
            .checked_mul(rhs.0)
            .ok_or(MathError::Overflow { op: "mul_up" })?;
        if product.is_zero() {
            return Ok(Self::ZERO);
        }
        Ok(Self((product - U256::one()) / Self::ONE.0 + U256::one()))
    }

    /// `floor(self · 10^18 / rhs)`
    pub fn div_down(self, rhs: Self) -> Result<Self, MathError> {
        if rhs.is_zero() {
            return Err(MathError::DivisionByZero { op: "div_down" });
        }
        let scaled = self
            .0
            .checked_mul(Self::ONE.0)
            .ok_or(MathError::Overflow { op: "div_down" })?;
        Ok(Self(scaled / rhs.0))
    }

    /// `ceil(self · 10^18 / rhs)`
    pub fn div_up(self, rhs: Self) -> Result<Self, MathError> {
        if rhs.is_zero() {
            return Err(MathError::DivisionByZero { op: "div_up" });
        }
        if self.is_zero() {
            return Ok(Self::ZERO);
        }
        let scaled = self
            .0
            .checked_mul(Self::ONE.0)
            .ok_or(MathError::Overflow { op: "div_up" })?;
        Ok(Self((scaled - U256::one()) / rhs.0 + U256::one()))
    }

    /// `1 - self`, floored at zero
    pub fn complement(self) -> Self {
        Self::ONE.saturating_sub(self)
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::ONE.0;
        let frac = (self.0 % Self::ONE.0).as_u64();
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:018}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl FromStr for FixedPoint {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

/// Largest power of ten that fits in 256 bits
const MAX_POW10: u32 = 77;

/// `10^exp` as a 256-bit integer
pub(crate) fn pow10(exp: u32) -> Result<U256, MathError> {
    if exp > MAX_POW10 {
        return Err(MathError::Overflow { op: "pow10" });
    }
    Ok(U256::exp10(exp as usize))
}

/// Parse a human-readable decimal amount into integer units at `decimals`
/// precision, truncating extra fractional digits.
///
/// Digits are consumed exactly, so inputs longer than `Decimal` precision do
/// not round. Either side of the point may be empty (`".5"`, `"5."`), but not both.
/// `parse_units("2388717.700457", 6)` yields `2388717700457`.
pub fn parse_units(s: &str, decimals: u32) -> Result<U256, MathError> {
    let invalid = || MathError::InvalidDecimal {
        input: s.to_string(),
    };
    let trimmed = s.trim();
    let (whole, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
        return Err(invalid());
    }
    if decimals > MAX_POW10 {
        return Err(MathError::Overflow { op: "parse_units" });
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    let kept = frac.len().min(decimals as usize);
    digits.push_str(&frac[..kept]);
    for _ in kept..decimals as usize {
        digits.push('0');
    }
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(digits).map_err(|_| MathError::Overflow { op: "parse_units" })
}

fn decimal_to_units(value: Decimal, decimals: u32) -> Result<U256, MathError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(MathError::InvalidDecimal {
            input: value.to_string(),
        });
    }
    let mantissa = U256::from(value.mantissa().unsigned_abs());
    let scale = value.scale();
    if scale <= decimals {
        mantissa
            .checked_mul(pow10(decimals - scale)?)
            .ok_or(MathError::Overflow { op: "from_decimal" })
    } else {
        Ok(mantissa / pow10(scale - decimals)?)
    }
}

/// Format integer units at `decimals` precision as a `Decimal`
///
/// Digits beyond the 28th decimal are truncated, and low-order fractional
/// digits are dropped until the value fits the 96-bit mantissa.
pub fn units_to_decimal(units: U256, decimals: u32) -> Result<Decimal, MathError> {
    let (mut units, mut scale) = if decimals > DECIMAL_MAX_SCALE {
        (units / pow10(decimals - DECIMAL_MAX_SCALE)?, DECIMAL_MAX_SCALE)
    } else {
        (units, decimals)
    };
    let ten = U256::from(10u8);
    while units.bits() > DECIMAL_MANTISSA_BITS && scale > 0 {
        units /= ten;
        scale -= 1;
    }
    if units.bits() > DECIMAL_MANTISSA_BITS {
        return Err(MathError::Overflow {
            op: "units_to_decimal",
        });
    }
    Decimal::try_from_i128_with_scale(units.low_u128() as i128, scale)
        .map(|d| d.normalize())
        .map_err(|_| MathError::Overflow {
            op: "units_to_decimal",
        })
}
