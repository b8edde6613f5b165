use super::*;
use crate::timeline::clip::Blend;

fn clip(id: &str, t0: TimeMs) -> Clip {
    Clip {
        id: id.into(),
        source_id: "s".into(),
        t0,
        in_frame: 0,
        out_frame: 1,
        blend: Blend::default(),
    }
}

#[test]
fn neighbors_bracket_a_query_between_two_clips() {
    let idx = ClipIndex::build(vec![clip("a", 0), clip("b", 1000)]);
    let (prev, next) = idx.find_neighbors(500);
    assert_eq!(prev.unwrap().id, "a");
    assert_eq!(next.unwrap().id, "b");
}

#[test]
fn query_before_first_clip_has_no_prev() {
    let idx = ClipIndex::build(vec![clip("a", 100)]);
    let (prev, next) = idx.find_neighbors(0);
    assert!(prev.is_none());
    assert_eq!(next.unwrap().id, "a");
}

#[test]
fn query_after_last_clip_has_no_next() {
    let idx = ClipIndex::build(vec![clip("a", 100)]);
    let (prev, next) = idx.find_neighbors(1000);
    assert_eq!(prev.unwrap().id, "a");
    assert!(next.is_none());
}

#[test]
fn exact_t0_counts_as_next_not_prev() {
    let idx = ClipIndex::build(vec![clip("a", 0), clip("b", 1000)]);
    let (prev, next) = idx.find_neighbors(1000);
    assert_eq!(prev.unwrap().id, "a");
    assert_eq!(next.unwrap().id, "b");
}

#[test]
fn unsorted_input_is_sorted_stably_by_t0() {
    let idx = ClipIndex::build(vec![clip("b", 1000), clip("a", 0), clip("c", 1000)]);
    assert_eq!(idx.clips()[0].id, "a");
    assert_eq!(idx.clips()[1].id, "b");
    assert_eq!(idx.clips()[2].id, "c");
}
