use super::*;
use crate::foundation::core::DOF;

fn pose_of(v: f64) -> Pose {
    [v; DOF]
}

fn entry(mode: BlendMode, priority: i32, weight: f64, pose: Pose, order: usize) -> StackEntry {
    StackEntry {
        mode,
        priority,
        weight,
        pose,
        order,
    }
}

#[test]
fn empty_stack_is_a_gap() {
    assert!(combine_stack(&[]).is_none());
}

#[test]
fn override_priority_wins_regardless_of_order() {
    let low = entry(BlendMode::Override, 0, 1.0, pose_of(1.0), 0);
    let high = entry(BlendMode::Override, 5, 1.0, pose_of(9.0), 1);
    let result = combine_stack(&[low, high]).unwrap();
    assert_eq!(result[0], 9.0);
}

#[test]
fn override_tie_break_prefers_first_in_sorted_order() {
    let first = entry(BlendMode::Override, 3, 1.0, pose_of(1.0), 0);
    let second = entry(BlendMode::Override, 3, 1.0, pose_of(2.0), 1);
    let result = combine_stack(&[second, first]).unwrap();
    assert_eq!(result[0], 1.0);
}

#[test]
fn crossfade_normalizes_weights() {
    let a = entry(BlendMode::Crossfade, 0, 1.0, pose_of(0.0), 0);
    let b = entry(BlendMode::Crossfade, 0, 1.0, pose_of(10.0), 1);
    let result = combine_stack(&[a, b]).unwrap();
    assert!((result[0] - 5.0).abs() < 1e-12);
}

#[test]
fn equal_weight_crossfade_of_identical_poses_is_weight_conserving() {
    let a = entry(BlendMode::Crossfade, 0, 0.5, pose_of(7.0), 0);
    let b = entry(BlendMode::Crossfade, 0, 0.5, pose_of(7.0), 1);
    let c = entry(BlendMode::Crossfade, 0, 0.5, pose_of(7.0), 2);
    let result = combine_stack(&[a, b, c]).unwrap();
    assert!((result[0] - 7.0).abs() < 1e-9);
}

#[test]
fn near_zero_weight_sum_falls_back_to_first_clip() {
    let a = entry(BlendMode::Crossfade, 0, 1e-13, pose_of(3.0), 0);
    let b = entry(BlendMode::Crossfade, 0, 1e-13, pose_of(9.0), 1);
    let result = combine_stack(&[a, b]).unwrap();
    assert_eq!(result[0], 3.0);
}

#[test]
fn additive_layers_on_top_of_override_base() {
    let base = entry(BlendMode::Override, 0, 1.0, pose_of(1.0), 0);
    let add = entry(BlendMode::Additive, 0, 0.5, pose_of(2.0), 1);
    let result = combine_stack(&[base, add]).unwrap();
    assert_eq!(result[0], 2.0);
}

#[test]
fn additive_only_stack_bases_at_zero() {
    let add = entry(BlendMode::Additive, 0, 2.0, pose_of(3.0), 0);
    let result = combine_stack(&[add]).unwrap();
    assert_eq!(result[0], 6.0);
}

#[test]
fn ramp_weight_is_one_outside_attack_and_decay_windows() {
    let w = ramp_weight(50.0, 100.0, 10, 10, Curve::Linear);
    assert_eq!(w, 1.0);
}

#[test]
fn ramp_weight_attacks_linearly_at_start() {
    let w = ramp_weight(5.0, 100.0, 10, 0, Curve::Linear);
    assert!((w - 0.5).abs() < 1e-9);
}

#[test]
fn ramp_weight_decays_linearly_at_end() {
    let w = ramp_weight(95.0, 100.0, 0, 10, Curve::Linear);
    assert!((w - 0.5).abs() < 1e-9);
}

#[test]
fn ramp_weight_is_one_for_degenerate_zero_length_clip() {
    assert_eq!(ramp_weight(0.0, 0.0, 10, 10, Curve::Linear), 1.0);
}
