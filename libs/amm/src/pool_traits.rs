//! Common interface for pricing pools in the router

use crate::errors::AmmError;
use crate::fixed_point::FixedPoint;
use crate::linear::{LinearPool, LinearPoolPairData};
use crate::stable::{StablePool, StablePoolPairData, StableSwapSolver};
use serde::{Deserialize, Serialize};

/// Supported pool families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    Linear,
    Stable,
}

/// Which side of a trade the caller fixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapKind {
    /// Amount in is fixed, quote the amount out
    ExactIn,
    /// Amount out is fixed, quote the amount in
    ExactOut,
}

/// Address equality ignoring hex case; no checksum validation
pub(crate) fn same_address(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Trait for pool quoting across pool families
pub trait AmmPool {
    /// Pair snapshot resolved once per routing pass
    type PairData;

    fn pool_id(&self) -> &str;

    fn pool_type(&self) -> PoolType;

    fn parse_pool_pair_data(
        &self,
        token_in: &str,
        token_out: &str,
    ) -> Result<Self::PairData, AmmError>;

    /// Amount out for an exact amount in, rounded down
    fn exact_token_in_for_token_out(
        &self,
        pair: &Self::PairData,
        amount_in: FixedPoint,
    ) -> Result<FixedPoint, AmmError>;

    /// Amount in for an exact amount out, rounded up
    fn token_in_for_exact_token_out(
        &self,
        pair: &Self::PairData,
        amount_out: FixedPoint,
    ) -> Result<FixedPoint, AmmError>;

    /// Quote either side of a trade
    fn quote(
        &self,
        pair: &Self::PairData,
        kind: SwapKind,
        amount: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        match kind {
            SwapKind::ExactIn => self.exact_token_in_for_token_out(pair, amount),
            SwapKind::ExactOut => self.token_in_for_exact_token_out(pair, amount),
        }
    }
}

impl AmmPool for LinearPool {
    type PairData = LinearPoolPairData;

    fn pool_id(&self) -> &str {
        &self.id
    }

    fn pool_type(&self) -> PoolType {
        PoolType::Linear
    }

    fn parse_pool_pair_data(
        &self,
        token_in: &str,
        token_out: &str,
    ) -> Result<LinearPoolPairData, AmmError> {
        LinearPool::parse_pool_pair_data(self, token_in, token_out)
    }

    fn exact_token_in_for_token_out(
        &self,
        pair: &LinearPoolPairData,
        amount_in: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        LinearPool::exact_token_in_for_token_out(self, pair, amount_in)
    }

    fn token_in_for_exact_token_out(
        &self,
        pair: &LinearPoolPairData,
        amount_out: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        LinearPool::token_in_for_exact_token_out(self, pair, amount_out)
    }
}

impl<S: StableSwapSolver> AmmPool for StablePool<S> {
    type PairData = StablePoolPairData;

    fn pool_id(&self) -> &str {
        &self.id
    }

    fn pool_type(&self) -> PoolType {
        PoolType::Stable
    }

    fn parse_pool_pair_data(
        &self,
        token_in: &str,
        token_out: &str,
    ) -> Result<StablePoolPairData, AmmError> {
        StablePool::parse_pool_pair_data(self, token_in, token_out)
    }

    /// Never fails: solver errors are already mapped to a zero quote
    fn exact_token_in_for_token_out(
        &self,
        pair: &StablePoolPairData,
        amount_in: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        Ok(StablePool::exact_token_in_for_token_out(self, pair, amount_in))
    }

    fn token_in_for_exact_token_out(
        &self,
        pair: &StablePoolPairData,
        amount_out: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        Ok(StablePool::token_in_for_exact_token_out(self, pair, amount_out))
    }
}
