//! Interface to an external StableSwap invariant solver

use crate::errors::SolverError;
use ethers_core::types::U256;
use std::sync::Arc;

/// StableSwap invariant solver operating on 18-decimal upscaled balances
///
/// `amp` carries the pool's amplification precision (e.g. `1573000` for an
/// amp of 1573 at three decimals). Implementations may fail, for instance
/// on overflow in the amplified invariant search; callers decide how to
/// surface that.
pub trait StableSwapSolver {
    fn calc_out_given_in(
        &self,
        amp: U256,
        balances: &[U256],
        token_index_in: usize,
        token_index_out: usize,
        amount_in: U256,
        swap_fee: U256,
    ) -> Result<U256, SolverError>;

    fn calc_in_given_out(
        &self,
        amp: U256,
        balances: &[U256],
        token_index_in: usize,
        token_index_out: usize,
        amount_out: U256,
        swap_fee: U256,
    ) -> Result<U256, SolverError>;
}

impl<T: StableSwapSolver + ?Sized> StableSwapSolver for Arc<T> {
    fn calc_out_given_in(
        &self,
        amp: U256,
        balances: &[U256],
        token_index_in: usize,
        token_index_out: usize,
        amount_in: U256,
        swap_fee: U256,
    ) -> Result<U256, SolverError> {
        (**self).calc_out_given_in(
            amp,
            balances,
            token_index_in,
            token_index_out,
            amount_in,
            swap_fee,
        )
    }

    fn calc_in_given_out(
        &self,
        amp: U256,
        balances: &[U256],
        token_index_in: usize,
        token_index_out: usize,
        amount_out: U256,
        swap_fee: U256,
    ) -> Result<U256, SolverError> {
        (**self).calc_in_given_out(
            amp,
            balances,
            token_index_in,
            token_index_out,
            amount_out,
            swap_fee,
        )
    }
}
