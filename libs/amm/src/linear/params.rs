//! Per-quote pool snapshot for linear pools

use crate::errors::AmmError;
use crate::fixed_point::FixedPoint;
use serde::{Deserialize, Serialize};

/// Fee, exchange rate and fee-free band of a linear pool
///
/// Built fresh from pool state at quote time and discarded afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearParams {
    /// Swap fee charged outside the target band, in [0, 1)
    pub fee: FixedPoint,
    /// Wrapped → main exchange rate, strictly positive
    pub rate: FixedPoint,
    pub lower_target: FixedPoint,
    pub upper_target: FixedPoint,
}

impl LinearParams {
    /// Build a validated parameter set
    pub fn new(
        fee: FixedPoint,
        rate: FixedPoint,
        lower_target: FixedPoint,
        upper_target: FixedPoint,
    ) -> Result<Self, AmmError> {
        let params = Self {
            fee,
            rate,
            lower_target,
            upper_target,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check `fee < 1`, `rate > 0` and `lower_target <= upper_target`
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.fee >= FixedPoint::ONE {
            return Err(AmmError::InvalidParams {
                reason: format!("fee {} must be below 1", self.fee),
            });
        }
        if self.rate.is_zero() {
            return Err(AmmError::InvalidParams {
                reason: "rate must be positive".to_string(),
            });
        }
        if self.lower_target > self.upper_target {
            return Err(AmmError::InvalidParams {
                reason: format!(
                    "lower target {} exceeds upper target {}",
                    self.lower_target, self.upper_target
                ),
            });
        }
        Ok(())
    }
}

/// Caller-supplied balances of a linear pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearBalances {
    pub main: FixedPoint,
    pub wrapped: FixedPoint,
    /// Virtual supply: total BPT minus the preminted, undistributed amount
    pub bpt_supply: FixedPoint,
}

impl LinearBalances {
    pub fn new(main: FixedPoint, wrapped: FixedPoint, bpt_supply: FixedPoint) -> Self {
        Self {
            main,
            wrapped,
            bpt_supply,
        }
    }
}
