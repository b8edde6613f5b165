//! Core scalar and vector types shared by every component.

/// Number of joints tracked by a [`Pose`]. Every source frame, every clip
/// boundary state, and every bridge segment is dimensioned to this.
pub const DOF: usize = 24;

/// A 24-component joint-position vector, in radians.
pub type Pose = [f64; DOF];

/// The zero pose, returned when no project is loaded.
pub fn zero_pose() -> Pose {
    [0.0; DOF]
}

/// `true` if every component of `pose` is finite.
pub fn pose_is_finite(pose: &Pose) -> bool {
    pose.iter().all(|v| v.is_finite())
}

/// Project-time milliseconds, as carried at the external interfaces.
pub type TimeMs = i64;

/// Rounds `value` to the nearest integer using round-half-to-even (banker's
/// rounding), as required for sample-time quantization.
pub fn round_half_to_even(value: f64) -> i64 {
    let floor = value.floor();
    let diff = value - floor;
    let floor_i = floor as i64;
    if diff < 0.5 {
        floor_i
    } else if diff > 0.5 {
        floor_i + 1
    } else if floor_i % 2 == 0 {
        floor_i
    } else {
        floor_i + 1
    }
}
