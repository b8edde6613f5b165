//! Clip sampler (C3): sub-frame linear interpolation within one clip.

use crate::foundation::core::{Pose, TimeMs};
use crate::source::Source;
use crate::timeline::Clip;

/// Samples `clip` against `source` at `t_ms`, returning `None` if `t_ms`
/// falls outside the clip's active interval. Never allocates a new source;
/// reads `source.frames` by reference.
pub fn sample_clip_at(clip: &Clip, source: &Source, t_ms: TimeMs) -> Option<Pose> {
    let dt_ms = source.dt_ms();
    let f = source.frame_count() as u64;
    let in_f = clip.in_frame.min(f.saturating_sub(1));
    let out_f = clip.out_frame.clamp(1, f);
    let length_ms = (out_f - in_f) as f64 * dt_ms;
    let local = (t_ms - clip.t0) as f64;
    if local < 0.0 || local > length_ms {
        return None;
    }

    let f_cont = in_f as f64 + local / dt_ms;
    let f0 = f_cont.floor();
    let frac = f_cont - f0;

    let f0 = (f0 as i64).clamp(in_f as i64, out_f as i64 - 1) as u64;
    let f1 = (f0 + 1).min(out_f - 1);

    let p0 = source.frames[f0 as usize];
    if f1 == f0 || frac <= 1e-12 {
        return Some(p0);
    }
    let p1 = source.frames[f1 as usize];
    let mut out = [0.0; crate::foundation::core::DOF];
    for j in 0..out.len() {
        out[j] = p0[j] * (1.0 - frac) + p1[j] * frac;
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/sample/clip_sampler.rs"]
mod tests;
