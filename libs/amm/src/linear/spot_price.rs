//! Spot price after a hypothetical trade, for the router's multi-path split
//!
//! Each price is `pool_factor = invariant / bpt_supply` (or `1` with zero
//! supply) combined with the one-sided derivative of the nominal transform at
//! the post-trade balance: [`Approach::FromAbove`] when the trade increased
//! the main balance, [`Approach::FromBelow`] when it decreased it.
//!
//! The price is piecewise constant in trade size, so its derivative is zero
//! everywhere except at the two targets, where it is unbounded. The derivative
//! functions return zero unconditionally and the caller's trade-size search is
//! expected to cope with the jumps.

use super::invariant::invariant_down;
use super::math::LinearMath;
use super::nominal::{from_nominal_derivative, to_nominal, to_nominal_derivative, Approach};
use super::params::{LinearBalances, LinearParams};
use crate::errors::{AmmError, MathError};
use crate::fixed_point::FixedPoint;

fn pool_factor_up(
    nominal_main: FixedPoint,
    balances: &LinearBalances,
    params: &LinearParams,
) -> Result<FixedPoint, MathError> {
    if balances.bpt_supply.is_zero() {
        return Ok(FixedPoint::ONE);
    }
    invariant_down(nominal_main, balances.wrapped, params)?.div_up(balances.bpt_supply)
}

impl LinearMath {
    /// main → BPT, exact main in
    pub fn spot_price_after_swap_bpt_out_per_main_in(
        main_in: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        let final_main_balance = balances.main.add(main_in)?;
        let previous_nominal_main = to_nominal(balances.main, params)?;
        let pool_factor = pool_factor_up(previous_nominal_main, balances, params)?;

        pool_factor.div_up(to_nominal_derivative(
            final_main_balance,
            params,
            Approach::FromAbove,
        )?)
    }

    /// main → BPT, exact BPT out
    pub fn spot_price_after_swap_main_in_per_bpt_out(
        bpt_out: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        let previous_nominal_main = to_nominal(balances.main, params)?;
        let pool_factor = pool_factor_up(previous_nominal_main, balances, params)?;
        let delta_nominal_main = bpt_out.mul_up(pool_factor)?;
        let after_nominal_main = previous_nominal_main.add(delta_nominal_main)?;

        pool_factor.mul_up(from_nominal_derivative(
            after_nominal_main,
            params,
            Approach::FromAbove,
        )?)
    }

    /// BPT → main, exact BPT in
    pub fn spot_price_after_swap_main_out_per_bpt_in(
        bpt_in: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        let previous_nominal_main = to_nominal(balances.main, params)?;
        let invariant = invariant_down(previous_nominal_main, balances.wrapped, params)?;
        let pool_factor = invariant.div_down(balances.bpt_supply)?;
        let delta_nominal_main = bpt_in.mul_down(pool_factor)?;
        // Floors at zero: an exit larger than the nominal balance prices the empty pool
        let after_nominal_main = previous_nominal_main.saturating_sub(delta_nominal_main);

        FixedPoint::ONE.div_up(pool_factor.mul_up(from_nominal_derivative(
            after_nominal_main,
            params,
            Approach::FromBelow,
        )?)?)
    }

    /// BPT → main, exact main out
    pub fn spot_price_after_swap_bpt_in_per_main_out(
        main_out: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        let final_main_balance = balances.main.sub(main_out)?;
        let previous_nominal_main = to_nominal(balances.main, params)?;
        let invariant = invariant_down(previous_nominal_main, balances.wrapped, params)?;
        let pool_factor = invariant.div_up(balances.bpt_supply)?;

        to_nominal_derivative(final_main_balance, params, Approach::FromBelow)?
            .div_up(pool_factor)
    }

    pub fn derivative_spot_price_after_swap_bpt_out_per_main_in(
        _main_in: FixedPoint,
        _balances: &LinearBalances,
        _params: &LinearParams,
    ) -> FixedPoint {
        FixedPoint::ZERO
    }

    pub fn derivative_spot_price_after_swap_main_in_per_bpt_out(
        _bpt_out: FixedPoint,
        _balances: &LinearBalances,
        _params: &LinearParams,
    ) -> FixedPoint {
        FixedPoint::ZERO
    }

    pub fn derivative_spot_price_after_swap_main_out_per_bpt_in(
        _bpt_in: FixedPoint,
        _balances: &LinearBalances,
        _params: &LinearParams,
    ) -> FixedPoint {
        FixedPoint::ZERO
    }

    pub fn derivative_spot_price_after_swap_bpt_in_per_main_out(
        _main_out: FixedPoint,
        _balances: &LinearBalances,
        _params: &LinearParams,
    ) -> FixedPoint {
        FixedPoint::ZERO
    }

    /// main ↔ wrapped has no direct leg in this pool; route through BPT instead
    pub fn spot_price_after_swap_exact_token_in_for_token_out(
        _amount: FixedPoint,
        _balances: &LinearBalances,
        _params: &LinearParams,
    ) -> Result<FixedPoint, AmmError> {
        Err(AmmError::UnsupportedOperation {
            operation: "linear token->token spot price (exact in)",
        })
    }

    pub fn spot_price_after_swap_token_in_for_exact_token_out(
        _amount: FixedPoint,
        _balances: &LinearBalances,
        _params: &LinearParams,
    ) -> Result<FixedPoint, AmmError> {
        Err(AmmError::UnsupportedOperation {
            operation: "linear token->token spot price (exact out)",
        })
    }

    pub fn derivative_spot_price_after_swap_exact_token_in_for_token_out(
        _amount: FixedPoint,
        _balances: &LinearBalances,
        _params: &LinearParams,
    ) -> Result<FixedPoint, AmmError> {
        Err(AmmError::UnsupportedOperation {
            operation: "linear token->token spot price derivative (exact in)",
        })
    }

    pub fn derivative_spot_price_after_swap_token_in_for_exact_token_out(
        _amount: FixedPoint,
        _balances: &LinearBalances,
        _params: &LinearParams,
    ) -> Result<FixedPoint, AmmError> {
        Err(AmmError::UnsupportedOperation {
            operation: "linear token->token spot price derivative (exact out)",
        })
    }
}
