//! Linear pool wrapper: resolves a token pair and dispatches to [`LinearMath`]

use super::math::LinearMath;
use super::params::{LinearBalances, LinearParams};
use crate::errors::AmmError;
use crate::fixed_point::FixedPoint;
use crate::pool_traits::{same_address, SwapKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Directed pair among the pool's three tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinearPairType {
    MainToBpt,
    BptToMain,
    WrappedToBpt,
    BptToWrapped,
    MainToWrapped,
    WrappedToMain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenRole {
    Main,
    Wrapped,
    Bpt,
}

/// Resolved swap pair for one linear pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearPoolPairData {
    pub pool_id: String,
    pub token_in: String,
    pub token_out: String,
    pub pair_type: LinearPairType,
}

/// Snapshot of a boosted linear pool
///
/// The BPT address doubles as the pool address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearPool {
    pub id: String,
    pub address: String,
    pub main_token: String,
    pub wrapped_token: String,
    pub params: LinearParams,
    pub balances: LinearBalances,
}

impl LinearPool {
    pub fn new(
        id: impl Into<String>,
        address: impl Into<String>,
        main_token: impl Into<String>,
        wrapped_token: impl Into<String>,
        params: LinearParams,
        balances: LinearBalances,
    ) -> Result<Self, AmmError> {
        params.validate()?;
        Ok(Self {
            id: id.into(),
            address: address.into(),
            main_token: main_token.into(),
            wrapped_token: wrapped_token.into(),
            params,
            balances,
        })
    }

    fn role_of(&self, token: &str) -> Result<TokenRole, AmmError> {
        if same_address(token, &self.main_token) {
            Ok(TokenRole::Main)
        } else if same_address(token, &self.wrapped_token) {
            Ok(TokenRole::Wrapped)
        } else if same_address(token, &self.address) {
            Ok(TokenRole::Bpt)
        } else {
            Err(AmmError::TokenNotInPool {
                token: token.to_string(),
            })
        }
    }

    pub fn parse_pool_pair_data(
        &self,
        token_in: &str,
        token_out: &str,
    ) -> Result<LinearPoolPairData, AmmError> {
        let pair_type = match (self.role_of(token_in)?, self.role_of(token_out)?) {
            (TokenRole::Main, TokenRole::Bpt) => LinearPairType::MainToBpt,
            (TokenRole::Bpt, TokenRole::Main) => LinearPairType::BptToMain,
            (TokenRole::Wrapped, TokenRole::Bpt) => LinearPairType::WrappedToBpt,
            (TokenRole::Bpt, TokenRole::Wrapped) => LinearPairType::BptToWrapped,
            (TokenRole::Main, TokenRole::Wrapped) => LinearPairType::MainToWrapped,
            (TokenRole::Wrapped, TokenRole::Main) => LinearPairType::WrappedToMain,
            _ => {
                return Err(AmmError::InvalidParams {
                    reason: format!("cannot swap {} for itself", token_in),
                })
            }
        };

        Ok(LinearPoolPairData {
            pool_id: self.id.clone(),
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            pair_type,
        })
    }

    /// Amount of `token_out` received for an exact `amount` of `token_in`
    pub fn exact_token_in_for_token_out(
        &self,
        pair: &LinearPoolPairData,
        amount: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        let (b, p) = (&self.balances, &self.params);
        let out = match pair.pair_type {
            LinearPairType::MainToBpt => LinearMath::bpt_out_per_main_in(amount, b, p),
            LinearPairType::BptToMain => LinearMath::main_out_per_bpt_in(amount, b, p),
            LinearPairType::WrappedToBpt => LinearMath::bpt_out_per_wrapped_in(amount, b, p),
            LinearPairType::BptToWrapped => LinearMath::wrapped_out_per_bpt_in(amount, b, p),
            LinearPairType::MainToWrapped => LinearMath::wrapped_out_per_main_in(amount, b, p),
            LinearPairType::WrappedToMain => LinearMath::main_out_per_wrapped_in(amount, b, p),
        }?;
        debug!(pool = %self.id, pair = ?pair.pair_type, %amount, %out, "linear exact-in quote");
        Ok(out)
    }

    /// Amount of `token_in` required for an exact `amount` of `token_out`
    pub fn token_in_for_exact_token_out(
        &self,
        pair: &LinearPoolPairData,
        amount: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        let (b, p) = (&self.balances, &self.params);
        let amount_in = match pair.pair_type {
            LinearPairType::MainToBpt => LinearMath::main_in_per_bpt_out(amount, b, p),
            LinearPairType::BptToMain => LinearMath::bpt_in_per_main_out(amount, b, p),
            LinearPairType::WrappedToBpt => LinearMath::wrapped_in_per_bpt_out(amount, b, p),
            LinearPairType::BptToWrapped => LinearMath::bpt_in_per_wrapped_out(amount, b, p),
            LinearPairType::MainToWrapped => LinearMath::main_in_per_wrapped_out(amount, b, p),
            LinearPairType::WrappedToMain => LinearMath::wrapped_in_per_main_out(amount, b, p),
        }?;
        debug!(
            pool = %self.id,
            pair = ?pair.pair_type,
            %amount,
            %amount_in,
            "linear exact-out quote"
        );
        Ok(amount_in)
    }

    /// Marginal price after trading `amount` on the main ↔ BPT legs
    ///
    /// Main ↔ wrapped has no direct leg and wrapped ↔ BPT prices are not
    /// modelled; both report [`AmmError::UnsupportedOperation`].
    pub fn spot_price_after_swap(
        &self,
        pair: &LinearPoolPairData,
        kind: SwapKind,
        amount: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        let (b, p) = (&self.balances, &self.params);
        let price = match (pair.pair_type, kind) {
            (LinearPairType::MainToBpt, SwapKind::ExactIn) => {
                LinearMath::spot_price_after_swap_bpt_out_per_main_in(amount, b, p)?
            }
            (LinearPairType::MainToBpt, SwapKind::ExactOut) => {
                LinearMath::spot_price_after_swap_main_in_per_bpt_out(amount, b, p)?
            }
            (LinearPairType::BptToMain, SwapKind::ExactIn) => {
                LinearMath::spot_price_after_swap_main_out_per_bpt_in(amount, b, p)?
            }
            (LinearPairType::BptToMain, SwapKind::ExactOut) => {
                LinearMath::spot_price_after_swap_bpt_in_per_main_out(amount, b, p)?
            }
            (LinearPairType::MainToWrapped | LinearPairType::WrappedToMain, SwapKind::ExactIn) => {
                return LinearMath::spot_price_after_swap_exact_token_in_for_token_out(amount, b, p)
            }
            (LinearPairType::MainToWrapped | LinearPairType::WrappedToMain, SwapKind::ExactOut) => {
                return LinearMath::spot_price_after_swap_token_in_for_exact_token_out(amount, b, p)
            }
            (LinearPairType::WrappedToBpt | LinearPairType::BptToWrapped, _) => {
                return Err(AmmError::UnsupportedOperation {
                    operation: "linear wrapped<->BPT spot price",
                })
            }
        };
        Ok(price)
    }

    pub fn derivative_spot_price_after_swap(
        &self,
        pair: &LinearPoolPairData,
        kind: SwapKind,
        amount: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        let (b, p) = (&self.balances, &self.params);
        match (pair.pair_type, kind) {
            (LinearPairType::MainToBpt, SwapKind::ExactIn) => Ok(
                LinearMath::derivative_spot_price_after_swap_bpt_out_per_main_in(amount, b, p),
            ),
            (LinearPairType::MainToBpt, SwapKind::ExactOut) => Ok(
                LinearMath::derivative_spot_price_after_swap_main_in_per_bpt_out(amount, b, p),
            ),
            (LinearPairType::BptToMain, SwapKind::ExactIn) => Ok(
                LinearMath::derivative_spot_price_after_swap_main_out_per_bpt_in(amount, b, p),
            ),
            (LinearPairType::BptToMain, SwapKind::ExactOut) => Ok(
                LinearMath::derivative_spot_price_after_swap_bpt_in_per_main_out(amount, b, p),
            ),
            (LinearPairType::MainToWrapped | LinearPairType::WrappedToMain, SwapKind::ExactIn) => {
                LinearMath::derivative_spot_price_after_swap_exact_token_in_for_token_out(
                    amount,
                    b,
                    p,
                )
            }
            (LinearPairType::MainToWrapped | LinearPairType::WrappedToMain, SwapKind::ExactOut) => {
                LinearMath::derivative_spot_price_after_swap_token_in_for_exact_token_out(
                    amount,
                    b,
                    p,
                )
            }
            (LinearPairType::WrappedToBpt | LinearPairType::BptToWrapped, _) => {
                Err(AmmError::UnsupportedOperation {
                    operation: "linear wrapped<->BPT spot price derivative",
                })
            }
        }
    }
}
