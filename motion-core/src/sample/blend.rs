//! Blend composer (C4): ramp weights and deterministic stack composition.

use crate::foundation::core::{Pose, DOF};
use crate::timeline::clip::{Blend, BlendMode, Curve};

/// Attack/decay ramp weight for a clip sampled at `local` ms into a clip of
/// `length` ms. Returns 1.0 for non-positive `length` (a degenerate,
/// effectively instantaneous clip is never ramped).
pub fn ramp_weight(local_ms: f64, length_ms: f64, in_ms: u32, out_ms: u32, curve: Curve) -> f64 {
    if length_ms <= 1e-9 {
        return 1.0;
    }
    let mut w = 1.0;
    if in_ms > 0 && local_ms < in_ms as f64 {
        let a = local_ms / (in_ms as f64).max(1.0);
        w *= curve.apply(a);
    }
    if out_ms > 0 && local_ms > (length_ms - out_ms as f64) {
        let tail = length_ms - local_ms;
        let a = tail / (out_ms as f64).max(1.0);
        w *= curve.apply(a);
    }
    w.clamp(0.0, 1.0)
}

/// The effective contribution weight of a clip given its blend config: for
/// `override`, the configured weight is ignored for composition purposes
/// (the winning override contributes its raw pose) but the ramp/weight
/// product still gates whether the clip is considered active at all.
pub fn contribution_weight(blend: &Blend, local_ms: f64, length_ms: f64) -> f64 {
    blend.weight * ramp_weight(local_ms, length_ms, blend.in_ms, blend.out_ms, blend.curve)
}

/// One clip's resolved contribution to a blend stack at a given instant.
#[derive(Clone, Copy, Debug)]
pub struct StackEntry {
    pub mode: BlendMode,
    pub priority: i32,
    pub weight: f64,
    pub pose: Pose,
    /// Original clip-index order, used to break priority/order ties the
    /// same way the sorted clip array would.
    pub order: usize,
}

fn zero() -> Pose {
    [0.0; DOF]
}

/// Deterministically reduces a blend stack to a single pose, or `None` if
/// the stack is empty (signals "gap" to the evaluator).
pub fn combine_stack(entries: &[StackEntry]) -> Option<Pose> {
    if entries.is_empty() {
        return None;
    }

    let normals: Vec<&StackEntry> = entries
        .iter()
        .filter(|e| matches!(e.mode, BlendMode::Override | BlendMode::Crossfade))
        .collect();
    let additives: Vec<&StackEntry> = entries
        .iter()
        .filter(|e| matches!(e.mode, BlendMode::Additive))
        .collect();

    let mut base = zero();
    if !normals.is_empty() {
        let overrides: Vec<&&StackEntry> = normals
            .iter()
            .filter(|e| e.mode == BlendMode::Override)
            .collect();
        if !overrides.is_empty() {
            let winner = overrides
                .iter()
                .max_by(|a, b| {
                    a.priority
                        .cmp(&b.priority)
                        .then(b.order.cmp(&a.order))
                })
                .unwrap();
            base = winner.pose;
        } else {
            let wsum: f64 = normals.iter().map(|e| e.weight).sum();
            if wsum <= 1e-12 {
                base = normals[0].pose;
            } else {
                for e in &normals {
                    let w = e.weight / wsum;
                    for j in 0..DOF {
                        base[j] += w * e.pose[j];
                    }
                }
            }
        }
    }

    for e in &additives {
        for j in 0..DOF {
            base[j] += e.weight * e.pose[j];
        }
    }

    Some(base)
}

#[cfg(test)]
#[path = "../../tests/unit/sample/blend.rs"]
mod tests;
