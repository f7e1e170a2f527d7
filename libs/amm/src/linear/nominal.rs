//! Piecewise nominal transform
//!
//! Maps a real main-token balance to the fee-adjusted nominal balance used by
//! the invariant. Three linear segments split at the targets:
//!
//! | segment                      | slope of `to_nominal` |
//! |------------------------------|-----------------------|
//! | `real < lower_target`        | `1 + fee`             |
//! | `lower ≤ real ≤ upper`       | `1`                   |
//! | `real > upper_target`        | `1 - fee`             |
//!
//! Fees are always rounded down. Directional rounding of a quote is enforced
//! by the caller, not here.

use super::params::LinearParams;
use crate::errors::MathError;
use crate::fixed_point::FixedPoint;

/// Side from which a breakpoint is approached when taking a one-sided derivative
///
/// `FromBelow` is the left derivative: a balance sitting exactly on a target
/// belongs to the lower segment. `FromAbove` is the right derivative: the
/// target belongs to the upper segment. Use `FromBelow` for a balance that a
/// trade just decreased and `FromAbove` for one it just increased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approach {
    FromBelow,
    FromAbove,
}

/// Segment of the piecewise transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    BelowLower,
    InBand,
    AboveUpper,
}

fn segment_of(amount: FixedPoint, params: &LinearParams, approach: Approach) -> Segment {
    match approach {
        Approach::FromBelow => {
            if amount <= params.lower_target {
                Segment::BelowLower
            } else if amount <= params.upper_target {
                Segment::InBand
            } else {
                Segment::AboveUpper
            }
        }
        Approach::FromAbove => {
            if amount < params.lower_target {
                Segment::BelowLower
            } else if amount < params.upper_target {
                Segment::InBand
            } else {
                Segment::AboveUpper
            }
        }
    }
}

/// Real balance → nominal balance
///
/// Fails with [`MathError::NegativeNominalBalance`] when the fee on the
/// shortfall exceeds the real balance.
pub fn to_nominal(real: FixedPoint, params: &LinearParams) -> Result<FixedPoint, MathError> {
    let fees = if real < params.lower_target {
        params.lower_target.sub(real)?.mul_down(params.fee)?
    } else if real <= params.upper_target {
        return Ok(real);
    } else {
        real.sub(params.upper_target)?.mul_down(params.fee)?
    };
    real.sub(fees).map_err(|_| MathError::NegativeNominalBalance {
        real: real.to_string(),
    })
}

/// Nominal balance → real balance, the per-segment inverse of [`to_nominal`]
///
/// Since `real = nominal + fees`, rounding the fees down rounds the real
/// balance down.
pub fn from_nominal(nominal: FixedPoint, params: &LinearParams) -> Result<FixedPoint, MathError> {
    if nominal < params.lower_target {
        nominal
            .add(params.fee.mul_down(params.lower_target)?)?
            .div_down(FixedPoint::ONE.add(params.fee)?)
    } else if nominal <= params.upper_target {
        Ok(nominal)
    } else {
        nominal
            .sub(params.fee.mul_down(params.upper_target)?)?
            .div_down(params.fee.complement())
    }
}

/// One-sided derivative of [`to_nominal`] at `amount`
pub fn to_nominal_derivative(
    amount: FixedPoint,
    params: &LinearParams,
    approach: Approach,
) -> Result<FixedPoint, MathError> {
    match segment_of(amount, params, approach) {
        Segment::BelowLower => FixedPoint::ONE.add(params.fee),
        Segment::InBand => Ok(FixedPoint::ONE),
        Segment::AboveUpper => Ok(params.fee.complement()),
    }
}

/// One-sided derivative of [`from_nominal`] at `amount`, rounded up
pub fn from_nominal_derivative(
    amount: FixedPoint,
    params: &LinearParams,
    approach: Approach,
) -> Result<FixedPoint, MathError> {
    match segment_of(amount, params, approach) {
        Segment::BelowLower => FixedPoint::ONE.div_up(FixedPoint::ONE.add(params.fee)?),
        Segment::InBand => Ok(FixedPoint::ONE),
        Segment::AboveUpper => FixedPoint::ONE.div_up(params.fee.complement()),
    }
}
