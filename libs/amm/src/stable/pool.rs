//! Stable pool quote wrapper
//!
//! Parses subgraph pool state into pair data, bounds trade sizes, and hands the
//! actual invariant solve to a [`StableSwapSolver`]. Solver failures become a
//! zero quote so the router treats the pool as having no liquidity for that
//! trade instead of aborting the whole search.

use super::limit_cache::{LimitCache, LimitKey};
use super::solver::StableSwapSolver;
use crate::config::StableQuoteConfig;
use crate::errors::{AmmError, MathError};
use crate::fixed_point::{parse_units, units_to_decimal, FixedPoint};
use crate::pool_traits::{same_address, SwapKind};
use ethers_core::types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Token entry as reported by the subgraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StablePoolTokenState {
    pub address: String,
    /// Balance as a decimal string in whole-token units
    pub balance: String,
    pub decimals: u32,
}

/// Raw stable pool state as reported by the subgraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StablePoolState {
    pub id: String,
    pub address: String,
    pub amp: Option<String>,
    pub swap_fee: String,
    pub total_shares: String,
    pub tokens: Vec<StablePoolTokenState>,
}

/// Pool token with its balance in native units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StablePoolToken {
    pub address: String,
    pub balance: U256,
    pub decimals: u32,
}

/// Resolved swap pair for one stable pool snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StablePoolPairData {
    pub pool_id: String,
    /// Pool snapshot this pair was parsed from
    pub snapshot: u64,
    pub token_in: String,
    pub token_out: String,
    /// Native units of `token_in`
    pub balance_in: U256,
    /// Native units of `token_out`
    pub balance_out: U256,
    pub swap_fee: FixedPoint,
    /// Every pool balance upscaled to 18 decimals, in pool token order
    pub all_balances_scaled: Vec<U256>,
    pub amp: U256,
    pub token_index_in: usize,
    pub token_index_out: usize,
    pub decimals_in: u32,
    pub decimals_out: u32,
}

/// Stable pool snapshot bound to an invariant solver
#[derive(Debug, Clone)]
pub struct StablePool<S> {
    pub id: String,
    /// BPT address
    pub address: String,
    /// Amplification scaled by `10^amp_precision`
    pub amp: U256,
    pub swap_fee: FixedPoint,
    pub total_shares: FixedPoint,
    pub tokens: Vec<StablePoolToken>,
    max_in_ratio: FixedPoint,
    max_out_ratio: FixedPoint,
    amp_precision: u32,
    snapshot: u64,
    solver: S,
}

impl<S: StableSwapSolver> StablePool<S> {
    /// Build a pool from subgraph state
    pub fn from_state(
        state: StablePoolState,
        config: &StableQuoteConfig,
        solver: S,
    ) -> Result<Self, AmmError> {
        let amp = state
            .amp
            .as_deref()
            .ok_or_else(|| AmmError::MissingAmplification {
                pool: state.id.clone(),
            })?;
        let amp = parse_units(amp, config.amp_precision)?;

        let tokens = state
            .tokens
            .iter()
            .map(|token| {
                Ok(StablePoolToken {
                    address: token.address.clone(),
                    balance: parse_units(&token.balance, token.decimals)?,
                    decimals: token.decimals,
                })
            })
            .collect::<Result<Vec<_>, MathError>>()?;
        if tokens.len() < 2 {
            return Err(AmmError::InvalidParams {
                reason: format!("stable pool {} has {} tokens", state.id, tokens.len()),
            });
        }

        Ok(Self {
            amp,
            swap_fee: FixedPoint::from_decimal_str(&state.swap_fee)?,
            total_shares: FixedPoint::from_decimal_str(&state.total_shares)?,
            tokens,
            max_in_ratio: FixedPoint::from_decimal(config.max_in_ratio)?,
            max_out_ratio: FixedPoint::from_decimal(config.max_out_ratio)?,
            amp_precision: config.amp_precision,
            snapshot: 0,
            solver,
            id: state.id,
            address: state.address,
        })
    }

    /// Monotonic counter bumped by every balance update
    pub fn snapshot(&self) -> u64 {
        self.snapshot
    }

    fn token_index(&self, token: &str) -> Result<usize, AmmError> {
        self.tokens
            .iter()
            .position(|t| same_address(&t.address, token))
            .ok_or_else(|| AmmError::TokenNotInPool {
                token: token.to_string(),
            })
    }

    pub fn parse_pool_pair_data(
        &self,
        token_in: &str,
        token_out: &str,
    ) -> Result<StablePoolPairData, AmmError> {
        let token_index_in = self.token_index(token_in)?;
        let token_index_out = self.token_index(token_out)?;
        if token_index_in == token_index_out {
            return Err(AmmError::InvalidParams {
                reason: format!("cannot swap {} for itself", token_in),
            });
        }

        let all_balances_scaled = self
            .tokens
            .iter()
            .map(|t| FixedPoint::from_native(t.balance, t.decimals).map(FixedPoint::raw))
            .collect::<Result<Vec<_>, MathError>>()?;

        let t_in = &self.tokens[token_index_in];
        let t_out = &self.tokens[token_index_out];
        Ok(StablePoolPairData {
            pool_id: self.id.clone(),
            snapshot: self.snapshot,
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            balance_in: t_in.balance,
            balance_out: t_out.balance,
            swap_fee: self.swap_fee,
            all_balances_scaled,
            amp: self.amp,
            token_index_in,
            token_index_out,
            decimals_in: t_in.decimals,
            decimals_out: t_out.decimals,
        })
    }

    /// Ranking heuristic: `balance_out · amp` in whole-token units
    pub fn normalized_liquidity(&self, pair: &StablePoolPairData) -> Result<Decimal, MathError> {
        let scaled = pair
            .balance_out
            .checked_mul(pair.amp)
            .ok_or(MathError::Overflow {
                op: "normalized_liquidity",
            })?;
        units_to_decimal(scaled, pair.decimals_out + self.amp_precision)
    }

    /// Largest trade the router may size against this pair, memoized per snapshot
    pub fn limit_amount_swap(
        &self,
        pair: &StablePoolPairData,
        kind: SwapKind,
        cache: &LimitCache,
    ) -> Result<FixedPoint, AmmError> {
        let key = LimitKey {
            pool_id: pair.pool_id.clone(),
            snapshot: pair.snapshot,
            token_index_in: pair.token_index_in,
            token_index_out: pair.token_index_out,
            kind,
        };

        let limit = cache.get_or_compute(key, || {
            let (balance, ratio, decimals) = match kind {
                SwapKind::ExactIn => (pair.balance_in, self.max_in_ratio, pair.decimals_in),
                SwapKind::ExactOut => (pair.balance_out, self.max_out_ratio, pair.decimals_out),
            };
            // native units times an 18-decimal ratio stays in native units
            let native = FixedPoint::from_raw(balance).mul_down(ratio)?;
            FixedPoint::from_native(native.raw(), decimals)
        })?;
        Ok(limit)
    }

    /// Apply a balance change from an executed swap
    ///
    /// `new_balance` is in native units of `token`; for the BPT it is the new
    /// total supply at 18 decimals.
    pub fn update_token_balance(&mut self, token: &str, new_balance: U256) -> Result<(), AmmError> {
        if same_address(token, &self.address) {
            self.total_shares = FixedPoint::from_raw(new_balance);
        } else {
            let index = self.token_index(token)?;
            self.tokens[index].balance = new_balance;
        }
        self.snapshot += 1;
        debug!(pool = %self.id, %token, snapshot = self.snapshot, "stable pool balance updated");
        Ok(())
    }

    /// Amount of `token_out` for an exact `amount` of `token_in`, truncated to
    /// the output token's decimals
    pub fn exact_token_in_for_token_out(
        &self,
        pair: &StablePoolPairData,
        amount: FixedPoint,
    ) -> FixedPoint {
        if amount.is_zero() {
            return FixedPoint::ZERO;
        }

        match self.solver.calc_out_given_in(
            self.amp,
            &pair.all_balances_scaled,
            pair.token_index_in,
            pair.token_index_out,
            amount.raw(),
            pair.swap_fee.raw(),
        ) {
            Ok(out) => FixedPoint::from_raw(out).round_down_to_decimals(pair.decimals_out),
            Err(err) => {
                warn!(
                    pool = %self.id,
                    %amount,
                    error = %err,
                    "stable out-given-in solve failed; quoting zero"
                );
                FixedPoint::ZERO
            }
        }
    }

    /// Amount of `token_in` needed for an exact `amount` of `token_out`,
    /// rounded up to the input token's decimals
    pub fn token_in_for_exact_token_out(
        &self,
        pair: &StablePoolPairData,
        amount: FixedPoint,
    ) -> FixedPoint {
        if amount.is_zero() {
            return FixedPoint::ZERO;
        }

        let amount_in = self
            .solver
            .calc_in_given_out(
                self.amp,
                &pair.all_balances_scaled,
                pair.token_index_in,
                pair.token_index_out,
                amount.raw(),
                pair.swap_fee.raw(),
            )
            .and_then(|raw| {
                FixedPoint::from_raw(raw)
                    .round_up_to_decimals(pair.decimals_in)
                    .map_err(Into::into)
            });

        match amount_in {
            Ok(amount_in) => amount_in,
            Err(err) => {
                warn!(
                    pool = %self.id,
                    %amount,
                    error = %err,
                    "stable in-given-out solve failed; quoting zero"
                );
                FixedPoint::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SolverError;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DAI: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
    const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
    const USDT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

    /// Returns a fixed raw amount and counts calls
    #[derive(Default)]
    struct FixedSolver {
        raw: U256,
        calls: AtomicUsize,
    }

    impl StableSwapSolver for FixedSolver {
        fn calc_out_given_in(
            &self,
            _amp: U256,
            _balances: &[U256],
            _token_index_in: usize,
            _token_index_out: usize,
            _amount_in: U256,
            _swap_fee: U256,
        ) -> Result<U256, SolverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.raw)
        }

        fn calc_in_given_out(
            &self,
            _amp: U256,
            _balances: &[U256],
            _token_index_in: usize,
            _token_index_out: usize,
            _amount_out: U256,
            _swap_fee: U256,
        ) -> Result<U256, SolverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.raw)
        }
    }

    #[derive(Debug)]
    struct FailingSolver;

    impl StableSwapSolver for FailingSolver {
        fn calc_out_given_in(
            &self,
            _amp: U256,
            _balances: &[U256],
            _token_index_in: usize,
            _token_index_out: usize,
            _amount_in: U256,
            _swap_fee: U256,
        ) -> Result<U256, SolverError> {
            Err(SolverError::Overflow)
        }

        fn calc_in_given_out(
            &self,
            _amp: U256,
            _balances: &[U256],
            _token_index_in: usize,
            _token_index_out: usize,
            _amount_out: U256,
            _swap_fee: U256,
        ) -> Result<U256, SolverError> {
            Err(SolverError::DidNotConverge { iterations: 255 })
        }
    }

    fn state() -> StablePoolState {
        let token = |address: &str, balance: &str, decimals| StablePoolTokenState {
            address: address.to_string(),
            balance: balance.to_string(),
            decimals,
        };
        StablePoolState {
            id: "0x06df3b2bbb68adc8b0e302443692037ed9f91b42000000000000000000000063".to_string(),
            address: "0x06df3b2bbb68adc8b0e302443692037ed9f91b42".to_string(),
            amp: Some("1573".to_string()),
            swap_fee: "0.0001".to_string(),
            total_shares: "126492330.1300445498456353".to_string(),
            tokens: vec![
                token(DAI, "46320407.8193498991491124", 18),
                token(USDC, "49127557.060817", 6),
                token(USDT, "31011327.083279", 6),
            ],
        }
    }

    fn pool<S: StableSwapSolver>(solver: S) -> StablePool<S> {
        StablePool::from_state(state(), &StableQuoteConfig::default(), solver).unwrap()
    }

    fn fp(s: &str) -> FixedPoint {
        FixedPoint::from_decimal_str(s).unwrap()
    }

    #[test]
    fn test_from_state_parses_strings() {
        let pool = pool(FailingSolver);
        assert_eq!(pool.amp, U256::from(1_573_000u64));
        assert_eq!(pool.swap_fee, fp("0.0001"));
        assert_eq!(pool.tokens[1].balance, U256::from(49_127_557_060_817u64));
        assert_eq!(pool.snapshot(), 0);
    }

    #[test]
    fn test_from_state_keeps_every_balance_digit() {
        let mut state = state();
        state.tokens[0].balance = "12345678901234.567890123456789012".to_string();
        state.total_shares = "98765432109876.543210987654321".to_string();

        let config = StableQuoteConfig::default();
        let pool = StablePool::from_state(state, &config, FailingSolver).unwrap();
        assert_eq!(
            pool.tokens[0].balance,
            U256::from_dec_str("12345678901234567890123456789012").unwrap()
        );
        assert_eq!(
            pool.total_shares.raw(),
            U256::from_dec_str("98765432109876543210987654321000").unwrap()
        );
    }

    #[test]
    fn test_missing_amp_is_rejected() {
        let mut state = state();
        state.amp = None;
        let err = StablePool::from_state(state, &StableQuoteConfig::default(), FailingSolver)
            .unwrap_err();
        assert!(matches!(err, AmmError::MissingAmplification { .. }));
    }

    #[test]
    fn test_pair_data_scales_balances_to_18_decimals() {
        let pool = pool(FailingSolver);
        // lower-case input still resolves
        let pair = pool
            .parse_pool_pair_data(&DAI.to_lowercase(), USDC)
            .unwrap();

        assert_eq!(pair.token_index_in, 0);
        assert_eq!(pair.token_index_out, 1);
        assert_eq!(pair.decimals_out, 6);
        assert_eq!(pair.all_balances_scaled[1], fp("49127557.060817").raw());
        assert_eq!(pair.all_balances_scaled[0], fp("46320407.8193498991491124").raw());
    }

    #[test]
    fn test_unknown_or_identical_token_is_rejected() {
        let pool = pool(FailingSolver);
        assert!(matches!(
            pool.parse_pool_pair_data(DAI, "0x0000000000000000000000000000000000000001"),
            Err(AmmError::TokenNotInPool { .. })
        ));
        assert!(matches!(
            pool.parse_pool_pair_data(DAI, DAI),
            Err(AmmError::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_normalized_liquidity() {
        let pool = pool(FailingSolver);
        let pair = pool.parse_pool_pair_data(DAI, USDC).unwrap();
        // 49127557.060817 * 1573
        assert_eq!(
            pool.normalized_liquidity(&pair).unwrap(),
            dec!(77277647256.665141)
        );

        // 18-decimal output token still fits after dropping low digits
        let pair = pool.parse_pool_pair_data(USDC, DAI).unwrap();
        let liquidity = pool.normalized_liquidity(&pair).unwrap();
        assert!(liquidity > dec!(72862001499.8) && liquidity < dec!(72862001499.9));
    }

    #[test]
    fn test_limit_amount_swap() {
        let pool = pool(FailingSolver);
        let cache = LimitCache::new();
        let pair = pool.parse_pool_pair_data(USDC, DAI).unwrap();

        // 30% of 49127557.060817 USDC truncated at 6 decimals
        assert_eq!(
            pool.limit_amount_swap(&pair, SwapKind::ExactIn, &cache).unwrap(),
            fp("14738267.118245")
        );
        // 30% of 46320407.8193498991491124 DAI
        assert_eq!(
            pool.limit_amount_swap(&pair, SwapKind::ExactOut, &cache).unwrap(),
            fp("13896122.34580496974473372")
        );
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_balance_update_invalidates_cached_limit() {
        let mut pool = pool(FailingSolver);
        let cache = LimitCache::new();
        let before = pool.parse_pool_pair_data(USDC, DAI).unwrap();
        let limit_before = pool.limit_amount_swap(&before, SwapKind::ExactIn, &cache).unwrap();

        pool.update_token_balance(USDC, U256::from(10_000_000u64)).unwrap();
        let after = pool.parse_pool_pair_data(USDC, DAI).unwrap();
        let limit_after = pool.limit_amount_swap(&after, SwapKind::ExactIn, &cache).unwrap();

        assert_eq!(pool.snapshot(), 1);
        assert_ne!(limit_before, limit_after);
        assert_eq!(limit_after, fp("3"));
    }

    #[test]
    fn test_update_bpt_sets_total_shares() {
        let mut pool = pool(FailingSolver);
        let address = pool.address.clone();
        pool.update_token_balance(&address, fp("100").raw()).unwrap();
        assert_eq!(pool.total_shares, fp("100"));

        assert!(matches!(
            pool.update_token_balance("0xdead", U256::one()),
            Err(AmmError::TokenNotInPool { .. })
        ));
    }

    #[test]
    fn test_zero_amount_skips_solver() {
        let pool = pool(FixedSolver::default());
        let pair = pool.parse_pool_pair_data(DAI, USDC).unwrap();

        assert_eq!(pool.exact_token_in_for_token_out(&pair, FixedPoint::ZERO), FixedPoint::ZERO);
        assert_eq!(pool.token_in_for_exact_token_out(&pair, FixedPoint::ZERO), FixedPoint::ZERO);
        assert_eq!(pool.solver.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_results_round_to_token_decimals() {
        let pool = pool(FixedSolver {
            raw: fp("1.234567891234567891").raw(),
            calls: AtomicUsize::new(0),
        });

        // DAI in, USDC out: truncated to 6 decimals
        let pair = pool.parse_pool_pair_data(DAI, USDC).unwrap();
        assert_eq!(pool.exact_token_in_for_token_out(&pair, fp("1")), fp("1.234567"));

        // USDC in for exact DAI out: rounded up to 6 decimals
        let pair = pool.parse_pool_pair_data(USDC, DAI).unwrap();
        assert_eq!(pool.token_in_for_exact_token_out(&pair, fp("1")), fp("1.234568"));

        // 18-decimal input keeps full precision
        let pair = pool.parse_pool_pair_data(USDC, DAI).unwrap();
        assert_eq!(
            pool.exact_token_in_for_token_out(&pair, fp("1")),
            fp("1.234567891234567891")
        );
    }

    #[test]
    fn test_solver_failure_quotes_zero() {
        let pool = pool(FailingSolver);
        let pair = pool.parse_pool_pair_data(DAI, USDT).unwrap();

        assert_eq!(pool.exact_token_in_for_token_out(&pair, fp("1000")), FixedPoint::ZERO);
        assert_eq!(pool.token_in_for_exact_token_out(&pair, fp("1000")), FixedPoint::ZERO);
    }
}
