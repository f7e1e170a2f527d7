//! Per-routing-pass cache of maximum trade sizes
//!
//! Owned by the routing pass rather than the pool, and keyed by the pool's
//! snapshot counter, so a balance update can never be answered with a limit
//! computed from the previous state.

use crate::errors::MathError;
use crate::fixed_point::FixedPoint;
use crate::pool_traits::SwapKind;
use dashmap::DashMap;
use tracing::debug;

/// Identity of one cached limit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LimitKey {
    pub pool_id: String,
    /// Pool snapshot the pair data was parsed from
    pub snapshot: u64,
    pub token_index_in: usize,
    pub token_index_out: usize,
    pub kind: SwapKind,
}

/// Concurrent limit cache shared by the workers of one routing pass
#[derive(Debug, Default)]
pub struct LimitCache {
    entries: DashMap<LimitKey, FixedPoint>,
}

impl LimitCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached limit or compute and store it
    ///
    /// Failed computations are not cached.
    pub fn get_or_compute<F>(&self, key: LimitKey, compute: F) -> Result<FixedPoint, MathError>
    where
        F: FnOnce() -> Result<FixedPoint, MathError>,
    {
        if let Some(cached) = self.entries.get(&key) {
            return Ok(*cached);
        }

        let value = compute()?;
        debug!(
            pool = %key.pool_id,
            snapshot = key.snapshot,
            kind = ?key.kind,
            %value,
            "limit cache miss"
        );
        self.entries.insert(key, value);
        Ok(value)
    }

    /// Drop every entry belonging to `pool_id`
    pub fn invalidate_pool(&self, pool_id: &str) {
        self.entries.retain(|key, _| key.pool_id != pool_id);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
