//! Trajectory evaluator (C7): ties the clip index, source store, blend
//! composer, and bridge synthesizer/cache into `eval_at`/`eval_range`.

use std::collections::HashMap;

use crate::bridge::{synthesize_bridge, BridgeCache, BridgeKey, JointLimits};
use crate::config::Config;
use crate::foundation::core::{pose_is_finite, round_half_to_even, zero_pose, Pose, TimeMs, DOF};
use crate::foundation::error::{MotionError, MotionResult};
use crate::foundation::math::finite_diff_vel;
use crate::project::Project;
use crate::sample::{combine_stack, contribution_weight, sample_clip_at, StackEntry};
use crate::source::{Source, SourceStore};
use crate::timeline::{Clip, ClipIndex};

fn gather_stack(clips: &ClipIndex, sources: &SourceStore, t_ms: TimeMs) -> Vec<StackEntry> {
    let mut out = Vec::new();
    for (order, clip) in clips.clips().iter().enumerate() {
        let Some(source) = sources.get(&clip.source_id) else {
            continue;
        };
        let Some(pose) = sample_clip_at(clip, source, t_ms) else {
            continue;
        };
        let length_ms = clip.length_ms(source.dt_ms());
        let local_ms = (t_ms - clip.t0) as f64;
        let weight = contribution_weight(&clip.blend, local_ms, length_ms);
        if weight < 1e-12 {
            continue;
        }
        out.push(StackEntry {
            mode: clip.blend.mode,
            priority: clip.blend.priority,
            weight,
            pose,
            order,
        });
    }
    out
}

/// Blends whatever clips are active at `t_ms`, ignoring gaps. Returns `None`
/// if nothing is active (the evaluator's signal to fall back to holds or a
/// bridge).
pub fn compose_no_bridge(clips: &ClipIndex, sources: &SourceStore, t_ms: TimeMs) -> Option<Pose> {
    combine_stack(&gather_stack(clips, sources, t_ms))
}

fn central_diff(a: Pose, b: Pose, h_ms: f64) -> Pose {
    let mut v = [0.0; DOF];
    let h_s = h_ms / 1000.0;
    for j in 0..DOF {
        v[j] = (b[j] - a[j]) / (2.0 * h_s);
    }
    v
}

fn last_frame_index(source: &Source) -> usize {
    source.frame_count().saturating_sub(1)
}

/// Estimated position and velocity at the start of a gap (the end of
/// `prev`).
fn start_boundary(
    clips: &ClipIndex,
    sources: &SourceStore,
    gap_start: f64,
    h_ms: f64,
    prev_source: &Source,
) -> (Pose, Pose) {
    let t_minus = round_half_to_even(gap_start - h_ms);
    let t_plus = round_half_to_even(gap_start + h_ms);
    let c_minus = compose_no_bridge(clips, sources, t_minus);
    let c_plus = compose_no_bridge(clips, sources, t_plus);

    let last_idx = last_frame_index(prev_source);
    let q0 = c_minus.unwrap_or(prev_source.frames[last_idx]);
    let v0 = match (c_minus, c_plus) {
        (Some(a), Some(b)) => central_diff(a, b, h_ms),
        _ => finite_diff_vel(&prev_source.frames, last_idx, prev_source.dt),
    };
    (q0, v0)
}

/// Estimated position and velocity at the end of a gap (the start of
/// `next`).
fn end_boundary(
    clips: &ClipIndex,
    sources: &SourceStore,
    next_start: f64,
    h_ms: f64,
    next_clip: &Clip,
    next_source: &Source,
) -> (Pose, Pose) {
    let t_minus = round_half_to_even(next_start - h_ms);
    let t_plus = round_half_to_even(next_start + h_ms);
    let c_minus = compose_no_bridge(clips, sources, t_minus);
    let c_plus = compose_no_bridge(clips, sources, t_plus);

    let in_idx = (next_clip.in_frame as usize).min(last_frame_index(next_source));
    let q1 = c_plus.unwrap_or(next_source.frames[in_idx]);
    let v1 = match (c_minus, c_plus) {
        (Some(a), Some(b)) => central_diff(a, b, h_ms),
        _ => finite_diff_vel(&next_source.frames, in_idx, next_source.dt),
    };
    (q1, v1)
}

fn widen_jerk(limits: &[JointLimits; DOF], factor: f64) -> [JointLimits; DOF] {
    let mut out = *limits;
    for l in out.iter_mut() {
        l.j_max *= factor;
    }
    out
}

/// Ties the sorted clip index, source store, blend composer, bridge
/// synthesizer and its cache together. Not internally synchronized: callers
/// that need thread safety wrap this behind a mutex (see [`crate::Core`]).
pub struct Evaluator {
    sources: SourceStore,
    clips: ClipIndex,
    cache: BridgeCache,
    config: Config,
}

impl Evaluator {
    pub fn new(config: Config) -> Self {
        Self {
            sources: SourceStore::build(HashMap::new()).expect("empty source map always valid"),
            clips: ClipIndex::build(Vec::new()),
            cache: BridgeCache::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[tracing::instrument(skip(self, config))]
    pub fn set_config(&mut self, config: Config) -> MotionResult<()> {
        config.validate()?;
        self.config = config;
        self.cache.clear();
        Ok(())
    }

    /// Atomically replaces sources and clips and clears the bridge cache.
    #[tracing::instrument(skip(self, project))]
    pub fn set_project(&mut self, project: Project) -> MotionResult<()> {
        project.validate()?;
        let sources = SourceStore::build(project.sources)?;
        let clips = ClipIndex::build(project.clips);
        self.sources = sources;
        self.clips = clips;
        self.cache.clear();
        Ok(())
    }

    fn clip_end_pose(&self, clip: &Clip) -> Pose {
        match self.sources.get(&clip.source_id) {
            Some(source) => {
                let idx = (clip.out_frame.saturating_sub(1) as usize).min(last_frame_index(source));
                source.frames[idx]
            }
            None => zero_pose(),
        }
    }

    fn eval_bridge(&mut self, prev: Clip, next: Clip, t_ms: TimeMs) -> Pose {
        let (prev_dt_ms, next_dt_ms) = {
            let prev_source = self.sources.get(&prev.source_id);
            let next_source = self.sources.get(&next.source_id);
            match (prev_source, next_source) {
                (Some(p), Some(n)) => (p.dt_ms(), n.dt_ms()),
                _ => return self.clip_end_pose(&prev),
            }
        };

        let gap_start = prev.t0 as f64 + prev.length_ms(prev_dt_ms);
        let next_start = next.t0 as f64;
        if next_start <= gap_start {
            return self.clip_end_pose(&prev);
        }

        let h_ms = prev_dt_ms.min(next_dt_ms).min(8.0);
        let (q0, v0, q1, v1) = {
            let prev_source = self.sources.get(&prev.source_id).unwrap();
            let (q0, v0) = start_boundary(&self.clips, &self.sources, gap_start, h_ms, prev_source);
            let next_source = self.sources.get(&next.source_id).unwrap();
            let (q1, v1) = end_boundary(
                &self.clips,
                &self.sources,
                next_start,
                h_ms,
                &next,
                next_source,
            );
            (q0, v0, q1, v1)
        };

        let t_gap_ms = next_start - gap_start;
        let t_gap_s = t_gap_ms / 1000.0;
        let key = BridgeKey::new(
            &prev.id,
            &next.id,
            prev.in_frame,
            prev.out_frame,
            next.in_frame,
            next.out_frame,
            prev.t0,
            next.t0,
            prev_dt_ms,
            next_dt_ms,
        );
        let t0_ms = round_half_to_even(gap_start);

        if self.cache.get(&key, t0_ms, t_gap_ms).is_none() {
            let limits = self.config.joint_limits();
            let trajectory = synthesize_bridge(&q0, &v0, &q1, &v1, &limits, t_gap_s)
                .or_else(|| {
                    let widened = widen_jerk(&limits, 1.25);
                    synthesize_bridge(&q0, &v0, &q1, &v1, &widened, t_gap_s)
                });
            match trajectory {
                Some(traj) => self.cache.put(key.clone(), t0_ms, t_gap_ms, traj),
                None => {
                    let err = MotionError::bridge_infeasible(format!(
                        "no feasible trajectory between '{}' and '{}' over a {:.1}ms gap",
                        prev.id, next.id, t_gap_ms
                    ));
                    tracing::warn!(
                        prev_id = %prev.id,
                        next_id = %next.id,
                        gap_ms = t_gap_ms,
                        error = %err,
                        "holding previous pose"
                    );
                    return self.clip_end_pose(&prev);
                }
            }
        }

        let traj = self.cache.get(&key, t0_ms, t_gap_ms).expect("just inserted");
        let tau = ((t_ms as f64 - gap_start) / 1000.0).clamp(0.0, traj.duration);
        traj.position_at(tau)
    }

    /// `eval_at(t_ms) -> pose[24]`.
    ///
    /// Only a complete `(prev, next)` pair is ever bridged; with just one
    /// neighbor, or none, the result is the zero pose rather than a held
    /// pose.
    #[tracing::instrument(skip(self))]
    pub fn eval_at(&mut self, t_ms: TimeMs) -> Pose {
        let pose = if let Some(pose) = compose_no_bridge(&self.clips, &self.sources, t_ms) {
            pose
        } else {
            let (prev, next) = self.clips.find_neighbors(t_ms);
            match (prev.cloned(), next.cloned()) {
                (Some(p), Some(n)) => self.eval_bridge(p, n, t_ms),
                _ => zero_pose(),
            }
        };
        debug_assert!(
            pose_is_finite(&pose),
            "eval_at produced a non-finite pose at t={t_ms}"
        );
        pose
    }

    /// `eval_range(t0, t1, step_ms) -> list<pose>`.
    /// Iterates `[t0, t1]` inclusive (within a 1 microsecond tolerance) in
    /// `step_ms` increments, rounding each sample instant half-to-even.
    #[tracing::instrument(skip(self))]
    pub fn eval_range(&mut self, t0_ms: TimeMs, t1_ms: TimeMs, step_ms: f64) -> Vec<Pose> {
        let step_ms = step_ms.max(1.0);
        let mut out = Vec::new();
        let mut t = t0_ms as f64;
        let end = t1_ms as f64 + 1e-3;
        while t <= end {
            out.push(self.eval_at(round_half_to_even(t)));
            t += step_ms;
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
