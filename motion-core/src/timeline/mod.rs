//! Clip placement and the sorted clip index (C2).

pub mod clip;
pub mod index;

pub use clip::{Blend, BlendMode, Clip, Curve};
pub use index::ClipIndex;
