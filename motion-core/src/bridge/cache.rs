//! Bridge cache: memoizes solved bridges keyed on the clip pair and gap
//! geometry that produced them.
//!
//! The key is a small tuple of primitives (two ids, eight integers), so it
//! is used directly as a `HashMap` key rather than run through a content
//! hash — a hashed fingerprint earns its keep on a much larger, nested
//! keyspace, not a ten-field tuple.

use std::collections::HashMap;

use crate::bridge::synth::BridgeTrajectory;
use crate::foundation::core::TimeMs;

/// Rounds a millisecond `dt` to the nearest integer millisecond so that
/// floating-point jitter in source frame rates doesn't fragment the cache.
fn round_dt(dt_ms: f64) -> i64 {
    dt_ms.round() as i64
}

/// Identifies a bridge by the two clips it spans and their relevant framing,
/// so that re-evaluating the same gap between the same two clips reuses the
/// previously solved trajectory.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct BridgeKey {
    pub prev_id: String,
    pub next_id: String,
    pub prev_in: u64,
    pub prev_out: u64,
    pub next_in: u64,
    pub next_out: u64,
    pub prev_t0: TimeMs,
    pub next_t0: TimeMs,
    pub dt_ms_prev: i64,
    pub dt_ms_next: i64,
}

impl BridgeKey {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        prev_id: &str,
        next_id: &str,
        prev_in: u64,
        prev_out: u64,
        next_in: u64,
        next_out: u64,
        prev_t0: TimeMs,
        next_t0: TimeMs,
        dt_ms_prev: f64,
        dt_ms_next: f64,
    ) -> Self {
        Self {
            prev_id: prev_id.to_string(),
            next_id: next_id.to_string(),
            prev_in,
            prev_out,
            next_in,
            next_out,
            prev_t0,
            next_t0,
            dt_ms_prev: round_dt(dt_ms_prev),
            dt_ms_next: round_dt(dt_ms_next),
        }
    }
}

/// A cached bridge plus the gap it was solved for, so that a cache hit can
/// still be rejected if the caller's requested window drifted beyond a
/// 0.5ms floating-point tolerance on gap boundaries before treating it as
/// a different gap.
pub struct BridgeCacheItem {
    pub t0_ms: TimeMs,
    pub t_gap_ms: f64,
    pub trajectory: BridgeTrajectory,
}

const GAP_TOLERANCE_MS: f64 = 0.5;

/// Process-lifetime memoization of solved bridges, cleared whenever the
/// active project changes.
#[derive(Default)]
pub struct BridgeCache {
    items: HashMap<BridgeKey, BridgeCacheItem>,
}

impl BridgeCache {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Returns the cached bridge for `key` if present and still matching the
    /// requested gap within tolerance.
    pub fn get(&self, key: &BridgeKey, t0_ms: TimeMs, t_gap_ms: f64) -> Option<&BridgeTrajectory> {
        let item = self.items.get(key)?;
        if item.t0_ms != t0_ms || (item.t_gap_ms - t_gap_ms).abs() > GAP_TOLERANCE_MS {
            return None;
        }
        Some(&item.trajectory)
    }

    pub fn put(&mut self, key: BridgeKey, t0_ms: TimeMs, t_gap_ms: f64, trajectory: BridgeTrajectory) {
        self.items.insert(
            key,
            BridgeCacheItem {
                t0_ms,
                t_gap_ms,
                trajectory,
            },
        );
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
