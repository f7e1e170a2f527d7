//! # Boosted AMM - Exact-Rounding Pool Pricing
//!
//! ## Purpose
//!
//! Pricing primitives for a swap router over boosted pools. The core is the
//! linear pool bonding curve: a piecewise "nominal" transform of the main token
//! balance that charges a fee outside a target band, composed into twelve
//! directional swap quotes and four spot-price-after-swap functions. A lighter
//! stable pool wrapper delegates the StableSwap solve to an external solver and
//! owns only caching, rounding and failure translation.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Pool snapshots (balances, fee, targets, rate) supplied by the router
//! - **Output Destinations**: Path-finding and trade-splitting in the router
//! - **Precision**: Every amount is an 18-decimal [`FixedPoint`] over `U256`
//! - **Rounding**: Amounts out round down, amounts in round up, fees round down
//!
//! ## Architecture Role
//!
//! ```text
//! FixedPoint ──► nominal transform ──► invariant ──► LinearMath quotes
//!                                                            │
//!                                    LinearPool pair dispatch ┤
//!                                                            ▼
//!                  StablePool + StableSwapSolver ──────► AmmPool trait
//! ```
//!
//! All quote functions are pure and synchronous. The only mutable state is the
//! [`LimitCache`] owned by a routing pass.

pub mod config;
pub mod errors;
pub mod fixed_point;
pub mod linear;
pub mod pool_traits;
pub mod stable;

pub use config::{QuoteConfig, StableQuoteConfig};
pub use errors::{AmmError, MathError, SolverError};
pub use fixed_point::{parse_units, units_to_decimal, FixedPoint, FIXED_DECIMALS};
pub use linear::{
    from_nominal, to_nominal, Approach, LinearBalances, LinearMath, LinearPairType, LinearParams,
    LinearPool, LinearPoolPairData,
};
pub use pool_traits::{AmmPool, PoolType, SwapKind};
pub use stable::{
    LimitCache, LimitKey, StablePool, StablePoolPairData, StablePoolState, StablePoolToken,
    StablePoolTokenState, StableSwapSolver,
};

/// Common types for AMM calculations
pub use ethers_core::types::U256;
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
