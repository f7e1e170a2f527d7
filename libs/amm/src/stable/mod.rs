//! Stable pools: quote wrapper around an external StableSwap solver

pub mod limit_cache;
pub mod pool;
pub mod solver;

pub use limit_cache::{LimitCache, LimitKey};
pub use pool::{
    StablePool, StablePoolPairData, StablePoolState, StablePoolToken, StablePoolTokenState,
};
pub use solver::StableSwapSolver;
