use super::*;
use crate::foundation::core::DOF;
use crate::timeline::Blend;

fn source(id: &str, n: usize) -> Source {
    Source {
        id: id.into(),
        dt: 0.1,
        frames: vec![[0.0; DOF]; n],
        name: None,
    }
}

fn clip(id: &str, source_id: &str, in_frame: u64, out_frame: u64) -> Clip {
    Clip {
        id: id.into(),
        source_id: source_id.into(),
        t0: 0,
        in_frame,
        out_frame,
        blend: Blend::default(),
    }
}

#[test]
fn empty_project_is_valid() {
    let p = Project {
        sources: HashMap::new(),
        clips: vec![],
        length_ms: None,
    };
    assert!(p.validate().is_ok());
}

#[test]
fn rejects_clip_referencing_unknown_source() {
    let p = Project {
        sources: HashMap::new(),
        clips: vec![clip("c1", "missing", 0, 3)],
        length_ms: None,
    };
    assert!(p.validate().is_err());
}

#[test]
fn rejects_clip_out_frame_beyond_source_length() {
    let mut sources = HashMap::new();
    sources.insert("s".to_string(), source("s", 3));
    let p = Project {
        sources,
        clips: vec![clip("c1", "s", 0, 10)],
        length_ms: None,
    };
    assert!(p.validate().is_err());
}

#[test]
fn accepts_well_formed_project() {
    let mut sources = HashMap::new();
    sources.insert("s".to_string(), source("s", 5));
    let p = Project {
        sources,
        clips: vec![clip("c1", "s", 0, 3)],
        length_ms: Some(300),
    };
    assert!(p.validate().is_ok());
}
