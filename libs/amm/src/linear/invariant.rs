//! Linear pool invariant: `nominal_main + wrapped · rate`
//!
//! Only the wrapped leg loses precision, so the up/down flavours differ in
//! how `wrapped · rate` is rounded. Call sites pick whichever direction is
//! conservative for the quote they produce.

use super::params::LinearParams;
use crate::errors::MathError;
use crate::fixed_point::FixedPoint;

pub fn invariant_up(
    nominal_main: FixedPoint,
    wrapped: FixedPoint,
    params: &LinearParams,
) -> Result<FixedPoint, MathError> {
    nominal_main.add(wrapped.mul_up(params.rate)?)
}

pub fn invariant_down(
    nominal_main: FixedPoint,
    wrapped: FixedPoint,
    params: &LinearParams,
) -> Result<FixedPoint, MathError> {
    nominal_main.add(wrapped.mul_down(params.rate)?)
}
