//! Sorted clip index with O(log N) neighbor lookup (C2).

use crate::foundation::core::TimeMs;
use crate::timeline::clip::Clip;

/// A clip list sorted ascending by `t0` (stable, so equal-`t0` clips keep
/// their original project order), with a parallel `t0` array for binary
/// search.
#[derive(Debug, Default)]
pub struct ClipIndex {
    clips: Vec<Clip>,
    t0s: Vec<TimeMs>,
}

impl ClipIndex {
    pub fn build(mut clips: Vec<Clip>) -> Self {
        clips.sort_by_key(|c| c.t0);
        let t0s = clips.iter().map(|c| c.t0).collect();
        Self { clips, t0s }
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// `next` is the first clip with `t0 >= t_ms` (or none); `prev` is the
    /// clip immediately before `next` in sorted order (or none).
    pub fn find_neighbors(&self, t_ms: TimeMs) -> (Option<&Clip>, Option<&Clip>) {
        let idx = self.t0s.partition_point(|&t0| t0 < t_ms);
        let next = self.clips.get(idx);
        let prev = if idx > 0 { self.clips.get(idx - 1) } else { None };
        (prev, next)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline_index.rs"]
mod tests;
