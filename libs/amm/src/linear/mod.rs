//! Boosted linear pools: main token, yield-bearing wrapped token and BPT
//!
//! The main balance is priced through a piecewise "nominal" transform that
//! charges a fee outside the `[lower_target, upper_target]` band. The invariant
//! is `nominal_main + wrapped · rate`, and every quote composes the two.

pub mod invariant;
pub mod math;
pub mod nominal;
pub mod params;
pub mod pool;
pub mod spot_price;

pub use math::LinearMath;
pub use nominal::{from_nominal, to_nominal, Approach};
pub use params::{LinearBalances, LinearParams};
pub use pool::{LinearPairType, LinearPool, LinearPoolPairData};
