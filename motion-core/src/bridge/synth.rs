//! Bridge synthesizer: a jerk-limited, duration-exact, per-joint
//! trajectory across a gap.
//!
//! This is a closed-form three-block double-S solve (ramp to a cruise
//! velocity, cruise, ramp to the boundary) rather than a general
//! time-optimal solver: boundary accelerations are always zero, which
//! keeps each ramp a two-sided jerk-limited segment with a simple closed
//! form, and the only free parameter needed to hit an exact,
//! externally-imposed duration is the cruise velocity.

use crate::foundation::core::{Pose, DOF};

/// Per-joint kinematic limits for bridge synthesis.
#[derive(Clone, Copy, Debug)]
pub struct JointLimits {
    pub v_max: f64,
    pub a_max: f64,
    pub j_max: f64,
}

/// A single jerk-limited ramp from velocity `va` to velocity `vb`, with zero
/// acceleration at both ends. Triangular in acceleration (two jerk phases)
/// if the peak acceleration needed stays under `a_max`; trapezoidal
/// (inserting a constant-acceleration plateau) otherwise.
#[derive(Clone, Copy, Debug)]
struct RampSegment {
    va: f64,
    tj: f64,
    ta: f64,
    a_peak: f64,
    sign: f64,
    j_max: f64,
}

impl RampSegment {
    fn build(va: f64, vb: f64, a_max: f64, j_max: f64) -> Self {
        let dv = vb - va;
        if dv.abs() < 1e-15 {
            return Self {
                va,
                tj: 0.0,
                ta: 0.0,
                a_peak: 0.0,
                sign: 0.0,
                j_max,
            };
        }
        let sign = dv.signum();
        let adv = dv.abs();
        let tj_triangular = (adv / j_max).sqrt();
        if j_max * tj_triangular <= a_max {
            Self {
                va,
                tj: tj_triangular,
                ta: 0.0,
                a_peak: j_max * tj_triangular,
                sign,
                j_max,
            }
        } else {
            let tj = a_max / j_max;
            let ta = adv / a_max - tj;
            Self {
                va,
                tj,
                ta,
                a_peak: a_max,
                sign,
                j_max,
            }
        }
    }

    fn duration(&self) -> f64 {
        2.0 * self.tj + self.ta
    }

    /// Displacement relative to the ramp's own start, at local time `t`
    /// (clamped to `[0, duration()]`).
    fn pos_at(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, self.duration());
        if self.sign == 0.0 {
            return self.va * t;
        }
        let (tj, ta, a_peak, s, j) = (self.tj, self.ta, self.a_peak, self.sign, self.j_max);
        if t <= tj {
            return self.va * t + s * (j * t.powi(3) / 6.0);
        }
        let pos_tj = self.va * tj + s * (j * tj.powi(3) / 6.0);
        let vel_tj = self.va + s * 0.5 * a_peak * tj;
        if t <= tj + ta {
            let u = t - tj;
            return pos_tj + vel_tj * u + s * 0.5 * a_peak * u * u;
        }
        let pos_t2 = pos_tj + vel_tj * ta + s * 0.5 * a_peak * ta * ta;
        let vel_t2 = vel_tj + s * a_peak * ta;
        let u = t - (tj + ta);
        pos_t2 + vel_t2 * u + s * (0.5 * a_peak * u * u - j * u.powi(3) / 6.0)
    }

    fn displacement(&self) -> f64 {
        self.pos_at(self.duration())
    }
}

/// A solved single-joint bridge: ramp to `cruise_vel`, hold, ramp to the
/// boundary velocity, over exactly the gap duration.
#[derive(Clone, Copy, Debug)]
struct JointBridge {
    q0: f64,
    ramp1: RampSegment,
    t_r1: f64,
    cruise_vel: f64,
    t_c: f64,
    ramp2: RampSegment,
    cruise_start: f64,
    ramp2_start: f64,
}

impl JointBridge {
    fn duration(&self) -> f64 {
        self.t_r1 + self.t_c + self.ramp2.duration()
    }

    fn position_at(&self, tau: f64) -> f64 {
        let tau = tau.clamp(0.0, self.duration());
        if tau <= self.t_r1 {
            return self.q0 + self.ramp1.pos_at(tau);
        }
        if tau <= self.t_r1 + self.t_c {
            return self.q0 + self.cruise_start + self.cruise_vel * (tau - self.t_r1);
        }
        self.q0 + self.ramp2_start + self.ramp2.pos_at(tau - self.t_r1 - self.t_c)
    }
}

const BRACKET_SAMPLES: usize = 161;
const BISECT_ITERS: usize = 60;

/// Solves one joint's bridge for the exact duration `t_gap` (seconds).
/// Returns `None` if no cruise velocity in `[-v_max, v_max]` both keeps the
/// two ramps within `t_gap` and reaches the required displacement.
fn solve_joint(
    q0: f64,
    v0: f64,
    q1: f64,
    v1: f64,
    limits: JointLimits,
    t_gap: f64,
) -> Option<JointBridge> {
    if t_gap <= 1e-9 {
        return None;
    }
    let d = q1 - q0;
    let vmax = limits.v_max;

    let eval = |vc: f64| -> Option<(RampSegment, RampSegment, f64, f64, f64)> {
        let ramp1 = RampSegment::build(v0, vc, limits.a_max, limits.j_max);
        let ramp2 = RampSegment::build(vc, v1, limits.a_max, limits.j_max);
        let t_r1 = ramp1.duration();
        let t_r2 = ramp2.duration();
        if t_r1 + t_r2 > t_gap {
            return None;
        }
        let t_c = t_gap - t_r1 - t_r2;
        let residual = ramp1.displacement() + vc * t_c + ramp2.displacement() - d;
        Some((ramp1, ramp2, t_r1, t_r2, residual))
    };

    let n = BRACKET_SAMPLES;
    let mut samples: Vec<(f64, f64)> = Vec::with_capacity(n);
    for i in 0..n {
        let vc = -vmax + 2.0 * vmax * (i as f64) / ((n - 1) as f64);
        if let Some((_, _, _, _, residual)) = eval(vc) {
            samples.push((vc, residual));
        }
    }

    if samples.is_empty() {
        return None;
    }

    let mut bracket: Option<(f64, f64, f64, f64)> = None;
    for w in samples.windows(2) {
        let (vc_lo, r_lo) = w[0];
        let (vc_hi, r_hi) = w[1];
        if r_lo == 0.0 {
            bracket = Some((vc_lo, r_lo, vc_lo, r_lo));
            break;
        }
        if r_lo.signum() != r_hi.signum() {
            bracket = Some((vc_lo, r_lo, vc_hi, r_hi));
            break;
        }
    }
    if bracket.is_none() {
        let last = *samples.last().unwrap();
        if last.1 == 0.0 {
            bracket = Some((last.0, last.1, last.0, last.1));
        }
    }

    let (mut lo, mut r_lo, mut hi, mut r_hi) = bracket?;
    let vc = if (hi - lo).abs() < 1e-15 {
        lo
    } else {
        for _ in 0..BISECT_ITERS {
            let mid = 0.5 * (lo + hi);
            let Some((_, _, _, _, r_mid)) = eval(mid) else {
                break;
            };
            if r_mid == 0.0 || (hi - lo).abs() < 1e-12 {
                lo = mid;
                hi = mid;
                break;
            }
            if r_mid.signum() == r_lo.signum() {
                lo = mid;
                r_lo = r_mid;
            } else {
                hi = mid;
                r_hi = r_mid;
            }
        }
        0.5 * (lo + hi)
    };

    let (ramp1, ramp2, t_r1, _t_r2, _residual) = eval(vc)?;
    let t_c = (t_gap - ramp1.duration() - ramp2.duration()).max(0.0);
    let cruise_start = ramp1.displacement();
    let ramp2_start = cruise_start + vc * t_c;

    Some(JointBridge {
        q0,
        ramp1,
        t_r1,
        cruise_vel: vc,
        t_c,
        ramp2,
        cruise_start,
        ramp2_start,
    })
}

/// A solved 24-joint bridge trajectory spanning `duration` seconds.
pub struct BridgeTrajectory {
    joints: Vec<JointBridge>,
    pub duration: f64,
}

impl BridgeTrajectory {
    /// Samples every joint at local time `tau` (seconds, clamped to
    /// `[0, duration]`).
    pub fn position_at(&self, tau: f64) -> Pose {
        let mut out = [0.0; DOF];
        for (j, joint) in self.joints.iter().enumerate() {
            out[j] = joint.position_at(tau);
        }
        out
    }
}

/// Attempts to synthesize a bridge across all 24 joints for exactly
/// `t_gap` seconds. Returns `None` if any joint fails to find a feasible
/// cruise velocity; callers should retry once with widened jerk limits
/// before giving up.
pub fn synthesize_bridge(
    q0: &Pose,
    v0: &Pose,
    q1: &Pose,
    v1: &Pose,
    limits: &[JointLimits; DOF],
    t_gap: f64,
) -> Option<BridgeTrajectory> {
    let mut joints = Vec::with_capacity(DOF);
    for j in 0..DOF {
        let joint = solve_joint(q0[j], v0[j], q1[j], v1[j], limits[j], t_gap)?;
        joints.push(joint);
    }
    Some(BridgeTrajectory {
        joints,
        duration: t_gap,
    })
}
