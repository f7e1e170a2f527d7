//! Linear pool swap quotes with exact on-chain rounding
//!
//! Every quote returning an amount the trader receives rounds each step
//! toward a smaller output; every quote returning an amount the trader pays
//! rounds each step toward a larger input. Results therefore bound the real
//! pool's answer from the pool's side and are safe for routing.

use super::invariant::{invariant_down, invariant_up};
use super::nominal::{from_nominal, to_nominal};
use super::params::{LinearBalances, LinearParams};
use crate::errors::MathError;
use crate::fixed_point::FixedPoint;

/// Linear pool math: main ↔ BPT, main ↔ wrapped and wrapped ↔ BPT legs
pub struct LinearMath;

impl LinearMath {
    /// BPT received for an exact main-token input
    ///
    /// With zero supply the first depositor receives the nominal value of the
    /// deposit.
    pub fn bpt_out_per_main_in(
        main_in: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        // Amount out, so we round down overall.
        if balances.bpt_supply.is_zero() {
            return to_nominal(main_in, params);
        }

        let previous_nominal_main = to_nominal(balances.main, params)?;
        let after_nominal_main = to_nominal(balances.main.add(main_in)?, params)?;
        let delta_nominal_main = after_nominal_main.sub(previous_nominal_main)?;
        let invariant = invariant_up(previous_nominal_main, balances.wrapped, params)?;

        balances
            .bpt_supply
            .mul_down(delta_nominal_main)?
            .div_down(invariant)
    }

    /// BPT that must be paid for an exact main-token output
    pub fn bpt_in_per_main_out(
        main_out: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        // Amount in, so we round up overall.
        let previous_nominal_main = to_nominal(balances.main, params)?;
        let after_nominal_main = to_nominal(balances.main.sub(main_out)?, params)?;
        let delta_nominal_main = previous_nominal_main.sub(after_nominal_main)?;
        let invariant = invariant_down(previous_nominal_main, balances.wrapped, params)?;

        balances
            .bpt_supply
            .mul_up(delta_nominal_main)?
            .div_up(invariant)
    }

    /// BPT that must be paid for an exact wrapped-token output
    pub fn bpt_in_per_wrapped_out(
        wrapped_out: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        // Amount in, so we round up overall.
        let nominal_main = to_nominal(balances.main, params)?;
        let previous_invariant = invariant_up(nominal_main, balances.wrapped, params)?;
        let new_wrapped_balance = balances.wrapped.sub(wrapped_out)?;
        let new_invariant = invariant_down(nominal_main, new_wrapped_balance, params)?;
        let new_bpt_balance = balances
            .bpt_supply
            .mul_down(new_invariant)?
            .div_down(previous_invariant)?;

        balances.bpt_supply.sub(new_bpt_balance)
    }

    /// Wrapped tokens received for an exact main-token input
    pub fn wrapped_out_per_main_in(
        main_in: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        // Amount out, so we round down overall.
        let previous_nominal_main = to_nominal(balances.main, params)?;
        let after_nominal_main = to_nominal(balances.main.add(main_in)?, params)?;
        let delta_nominal_main = after_nominal_main.sub(previous_nominal_main)?;

        delta_nominal_main.div_down(params.rate)
    }

    /// Wrapped tokens that must be paid for an exact main-token output
    pub fn wrapped_in_per_main_out(
        main_out: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        // Amount in, so we round up overall.
        let previous_nominal_main = to_nominal(balances.main, params)?;
        let after_nominal_main = to_nominal(balances.main.sub(main_out)?, params)?;
        let delta_nominal_main = previous_nominal_main.sub(after_nominal_main)?;

        delta_nominal_main.div_up(params.rate)
    }

    /// Main tokens that must be paid for an exact BPT output
    pub fn main_in_per_bpt_out(
        bpt_out: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        // Amount in, so we round up overall.
        if balances.bpt_supply.is_zero() {
            return from_nominal(bpt_out, params);
        }

        let previous_nominal_main = to_nominal(balances.main, params)?;
        let invariant = invariant_up(previous_nominal_main, balances.wrapped, params)?;
        let delta_nominal_main = invariant.mul_up(bpt_out)?.div_up(balances.bpt_supply)?;
        let after_nominal_main = previous_nominal_main.add(delta_nominal_main)?;
        let new_main_balance = from_nominal(after_nominal_main, params)?;

        new_main_balance.sub(balances.main)
    }

    /// Main tokens received for an exact BPT input
    pub fn main_out_per_bpt_in(
        bpt_in: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        // Amount out, so we round down overall.
        let previous_nominal_main = to_nominal(balances.main, params)?;
        let invariant = invariant_down(previous_nominal_main, balances.wrapped, params)?;
        let delta_nominal_main = invariant.mul_down(bpt_in)?.div_down(balances.bpt_supply)?;
        let after_nominal_main = previous_nominal_main.sub(delta_nominal_main)?;
        let new_main_balance = from_nominal(after_nominal_main, params)?;

        balances.main.sub(new_main_balance)
    }

    /// Main tokens received for an exact wrapped-token input
    pub fn main_out_per_wrapped_in(
        wrapped_in: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        // Amount out, so we round down overall.
        let previous_nominal_main = to_nominal(balances.main, params)?;
        let delta_nominal_main = wrapped_in.mul_down(params.rate)?;
        let after_nominal_main = previous_nominal_main.sub(delta_nominal_main)?;
        let new_main_balance = from_nominal(after_nominal_main, params)?;

        balances.main.sub(new_main_balance)
    }

    /// Main tokens that must be paid for an exact wrapped-token output
    pub fn main_in_per_wrapped_out(
        wrapped_out: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        // Amount in, so we round up overall.
        let previous_nominal_main = to_nominal(balances.main, params)?;
        let delta_nominal_main = wrapped_out.mul_up(params.rate)?;
        let after_nominal_main = previous_nominal_main.add(delta_nominal_main)?;
        let new_main_balance = from_nominal(after_nominal_main, params)?;

        new_main_balance.sub(balances.main)
    }

    /// BPT received for an exact wrapped-token input
    pub fn bpt_out_per_wrapped_in(
        wrapped_in: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        // Amount out, so we round down overall.
        if balances.bpt_supply.is_zero() {
            // Nominal main value of the deposit
            return wrapped_in.mul_down(params.rate);
        }

        let nominal_main = to_nominal(balances.main, params)?;
        let previous_invariant = invariant_up(nominal_main, balances.wrapped, params)?;
        let new_wrapped_balance = balances.wrapped.add(wrapped_in)?;
        let new_invariant = invariant_down(nominal_main, new_wrapped_balance, params)?;
        let new_bpt_balance = balances
            .bpt_supply
            .mul_down(new_invariant)?
            .div_down(previous_invariant)?;

        new_bpt_balance.sub(balances.bpt_supply)
    }

    /// Wrapped tokens that must be paid for an exact BPT output
    pub fn wrapped_in_per_bpt_out(
        bpt_out: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        // Amount in, so we round up overall.
        if balances.bpt_supply.is_zero() {
            return bpt_out.div_up(params.rate);
        }

        let nominal_main = to_nominal(balances.main, params)?;
        let previous_invariant = invariant_up(nominal_main, balances.wrapped, params)?;
        let new_bpt_balance = balances.bpt_supply.add(bpt_out)?;
        let new_wrapped_balance = new_bpt_balance
            .div_up(balances.bpt_supply)?
            .mul_up(previous_invariant)?
            .sub(nominal_main)?
            .div_up(params.rate)?;

        new_wrapped_balance.sub(balances.wrapped)
    }

    /// Wrapped tokens received for an exact BPT input
    pub fn wrapped_out_per_bpt_in(
        bpt_in: FixedPoint,
        balances: &LinearBalances,
        params: &LinearParams,
    ) -> Result<FixedPoint, MathError> {
        // Amount out, so we round down overall.
        let nominal_main = to_nominal(balances.main, params)?;
        let previous_invariant = invariant_up(nominal_main, balances.wrapped, params)?;
        let new_bpt_balance = balances.bpt_supply.sub(bpt_in)?;
        let new_wrapped_balance = new_bpt_balance
            .div_up(balances.bpt_supply)?
            .mul_up(previous_invariant)?
            .sub(nominal_main)?
            .div_up(params.rate)?;

        balances.wrapped.sub(new_wrapped_balance)
    }

    /// Proportional exit: every non-BPT balance scaled by `bpt_in / supply`
    ///
    /// The BPT slot holds preminted, undistributed tokens that belong to no
    /// LP, so its entry is always zero.
    pub fn tokens_out_given_exact_bpt_in(
        balances: &[FixedPoint],
        bpt_amount_in: FixedPoint,
        bpt_total_supply: FixedPoint,
        bpt_index: usize,
    ) -> Result<Vec<FixedPoint>, MathError> {
        // Amount out, so both the ratio and the products round down.
        let bpt_ratio = bpt_amount_in.div_down(bpt_total_supply)?;
        balances
            .iter()
            .enumerate()
            .map(|(i, balance)| {
                if i == bpt_index {
                    Ok(FixedPoint::ZERO)
                } else {
                    balance.mul_down(bpt_ratio)
                }
            })
            .collect()
    }
}
