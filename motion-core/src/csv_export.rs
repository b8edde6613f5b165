//! Trajectory CSV export.

use crate::core::Core;
use crate::foundation::core::{TimeMs, DOF};

/// Renders `time,q0,...,q23` rows for `[t0_ms, t1_ms]` sampled every
/// `step_ms`, matching the original endpoint's formatting: time in seconds
/// with 6 decimal digits, joint values with 9.
pub fn export_csv(core: &Core, t0_ms: TimeMs, t1_ms: TimeMs, step_ms: f64, include_header: bool) -> String {
    let poses = core.eval_range(t0_ms, t1_ms, step_ms);
    let mut out = String::new();

    if include_header {
        out.push_str("time");
        for j in 0..DOF {
            out.push_str(&format!(",q{j}"));
        }
        out.push('\n');
    }

    for (i, pose) in poses.iter().enumerate() {
        let t_s = (t0_ms as f64 + i as f64 * step_ms) / 1000.0;
        out.push_str(&format!("{t_s:.6}"));
        for v in pose {
            out.push_str(&format!(",{v:.9}"));
        }
        out.push('\n');
    }

    out
}
