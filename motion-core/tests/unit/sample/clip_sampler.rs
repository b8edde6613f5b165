use super::*;
use crate::foundation::core::DOF;
use crate::timeline::Blend;

fn ramp_source(slope: f64, n: usize) -> Source {
    Source {
        id: "s".into(),
        dt: 0.1,
        frames: (0..n)
            .map(|i| {
                let mut p = [0.0; DOF];
                p.iter_mut().for_each(|v| *v = slope * i as f64);
                p
            })
            .collect(),
        name: None,
    }
}

fn clip(t0: i64, in_frame: u64, out_frame: u64) -> Clip {
    Clip {
        id: "c".into(),
        source_id: "s".into(),
        t0,
        in_frame,
        out_frame,
        blend: Blend::default(),
    }
}

#[test]
fn single_clip_scenario_from_spec_seed_1() {
    // Source A: dt=0.1, frames [0,1,2]; clip t0=0, in=0, out=3.
    let source = ramp_source(1.0, 3);
    let c = clip(0, 0, 3);
    assert_eq!(sample_clip_at(&c, &source, 150).unwrap()[0], 1.5);
    assert_eq!(sample_clip_at(&c, &source, 300).unwrap()[0], 2.0);
    assert!(sample_clip_at(&c, &source, 450).is_none());
}

#[test]
fn exact_frame_boundaries_return_unmodified_source_frame() {
    let source = ramp_source(1.0, 3);
    let c = clip(0, 0, 3);
    assert_eq!(sample_clip_at(&c, &source, 0).unwrap()[0], 0.0);
    assert_eq!(sample_clip_at(&c, &source, 100).unwrap()[0], 1.0);
}

#[test]
fn before_clip_start_is_none() {
    let source = ramp_source(1.0, 3);
    let c = clip(1000, 0, 3);
    assert!(sample_clip_at(&c, &source, 999).is_none());
}

#[test]
fn inframe_offset_into_source_is_respected() {
    let source = ramp_source(1.0, 5);
    let c = clip(0, 2, 4);
    // local=0 -> frame index 2 -> value 2.0
    assert_eq!(sample_clip_at(&c, &source, 0).unwrap()[0], 2.0);
}
