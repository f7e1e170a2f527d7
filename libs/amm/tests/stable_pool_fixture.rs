//! Stable pool wrapper against a mainnet DAI/USDC/USDT snapshot

use boosted_amm::{
    AmmPool, FixedPoint, LimitCache, PoolType, QuoteConfig, SolverError, StablePool,
    StablePoolPairData, StablePoolState, StableQuoteConfig, StableSwapSolver, SwapKind, U256,
};
use rust_decimal_macros::dec;
use std::sync::Arc;

const DAI: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";
const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
const USDT: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";

/// Constant-sum stand-in for the StableSwap solver: one unit for one unit,
/// less the swap fee
struct ConstantSumSolver;

impl StableSwapSolver for ConstantSumSolver {
    fn calc_out_given_in(
        &self,
        _amp: U256,
        balances: &[U256],
        _token_index_in: usize,
        token_index_out: usize,
        amount_in: U256,
        swap_fee: U256,
    ) -> Result<U256, SolverError> {
        let fee = FixedPoint::from_raw(swap_fee);
        let out = FixedPoint::from_raw(amount_in).mul_down(fee.complement())?;
        if out.raw() > balances[token_index_out] {
            return Err(SolverError::InvalidInput {
                reason: "insufficient balance out".to_string(),
            });
        }
        Ok(out.raw())
    }

    fn calc_in_given_out(
        &self,
        _amp: U256,
        balances: &[U256],
        _token_index_in: usize,
        token_index_out: usize,
        amount_out: U256,
        swap_fee: U256,
    ) -> Result<U256, SolverError> {
        if amount_out > balances[token_index_out] {
            return Err(SolverError::InvalidInput {
                reason: "insufficient balance out".to_string(),
            });
        }
        let fee = FixedPoint::from_raw(swap_fee);
        Ok(FixedPoint::from_raw(amount_out)
            .div_up(fee.complement())?
            .raw())
    }
}

fn fixture() -> StablePoolState {
    serde_json::from_str(include_str!("fixtures/mock_stable_pool.json")).unwrap()
}

fn pool() -> StablePool<ConstantSumSolver> {
    StablePool::from_state(fixture(), &StableQuoteConfig::default(), ConstantSumSolver).unwrap()
}

fn fp(s: &str) -> FixedPoint {
    FixedPoint::from_decimal_str(s).unwrap()
}

fn limit_of(
    pool: &StablePool<ConstantSumSolver>,
    pair: &StablePoolPairData,
    cache: &LimitCache,
) -> FixedPoint {
    pool.limit_amount_swap(pair, SwapKind::ExactIn, cache).unwrap()
}

#[test]
fn test_fixture_parses() {
    let state = fixture();
    assert_eq!(state.amp.as_deref(), Some("1573"));
    assert_eq!(state.tokens.len(), 3);
    assert_eq!(state.tokens[0].decimals, 18);

    let pool = pool();
    assert_eq!(pool.pool_type(), PoolType::Stable);
    assert_eq!(pool.total_shares, fp("125790426.672745691867298094"));
}

#[test]
fn test_exact_in_truncates_to_output_decimals() {
    let pool = pool();
    let pair = pool.parse_pool_pair_data(DAI, USDC).unwrap();

    // 1234.567891234567891 * 0.9999 = 1234.44443444544443421, cut at 6 places
    let out = pool
        .quote(&pair, SwapKind::ExactIn, fp("1234.567891234567891"))
        .unwrap();
    assert_eq!(out, fp("1234.444434"));
}

#[test]
fn test_exact_out_rounds_input_up() {
    let pool = pool();
    let pair = pool.parse_pool_pair_data(USDC, DAI).unwrap();

    // 1000 / 0.9999 = 1000.10001000100010001..., rounded up at 6 places
    let amount_in = pool.quote(&pair, SwapKind::ExactOut, fp("1000")).unwrap();
    assert_eq!(amount_in, fp("1000.100011"));
}

#[test]
fn test_solver_rejection_is_zero_quote() {
    let pool = pool();
    let pair = pool.parse_pool_pair_data(DAI, USDT).unwrap();

    assert_eq!(
        pool.quote(&pair, SwapKind::ExactOut, fp("40000000")).unwrap(),
        FixedPoint::ZERO
    );
    assert_eq!(
        pool.quote(&pair, SwapKind::ExactIn, fp("40000000")).unwrap(),
        FixedPoint::ZERO
    );
}

#[test]
fn test_limits_follow_config() {
    let config = QuoteConfig::from_toml_str(
        r#"
[stable]
max_in_ratio = "0.1"
"#,
    )
    .unwrap();
    let pool = StablePool::from_state(fixture(), &config.stable, ConstantSumSolver).unwrap();
    let cache = LimitCache::new();
    let pair = pool.parse_pool_pair_data(USDC, USDT).unwrap();

    assert_eq!(
        pool.limit_amount_swap(&pair, SwapKind::ExactIn, &cache).unwrap(),
        fp("4912755.706081")
    );
    assert_eq!(
        pool.limit_amount_swap(&pair, SwapKind::ExactOut, &cache).unwrap(),
        fp("9303398.124983")
    );
}

#[test]
fn test_normalized_liquidity_ranks_by_output_side() {
    let pool = pool();
    let to_usdc = pool.parse_pool_pair_data(DAI, USDC).unwrap();
    let to_usdt = pool.parse_pool_pair_data(DAI, USDT).unwrap();

    let usdc = pool.normalized_liquidity(&to_usdc).unwrap();
    let usdt = pool.normalized_liquidity(&to_usdt).unwrap();
    assert_eq!(usdc, dec!(77277647256.665141));
    assert!(usdt < usdc);
}

#[test]
fn test_limit_cache_shared_across_threads() {
    let pool = pool();
    let cache = LimitCache::new();
    let pair = pool.parse_pool_pair_data(DAI, USDC).unwrap();

    let limits: Vec<FixedPoint> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| limit_of(&pool, &pair, &cache)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(limits.iter().all(|limit| *limit == limits[0]));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_shared_solver_behind_arc() {
    let solver: Arc<dyn StableSwapSolver + Send + Sync> = Arc::new(ConstantSumSolver);
    let pool = StablePool::from_state(fixture(), &StableQuoteConfig::default(), solver).unwrap();
    let pair = pool.parse_pool_pair_data(USDT, USDC).unwrap();

    assert_eq!(
        pool.exact_token_in_for_token_out(&pair, fp("10000")),
        fp("9999")
    );
}
