//! The submitted project shape and its validation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::foundation::core::TimeMs;
use crate::foundation::error::MotionError;
use crate::source::Source;
use crate::timeline::Clip;

/// A full timeline submission: every source referenced by a clip, plus the
/// clip placements themselves. `set_project` replaces the evaluator's state
/// with this, atomically, or rejects it outright.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub sources: HashMap<String, Source>,
    pub clips: Vec<Clip>,
    /// Optional declared total length; informational only, not enforced
    /// against clip placement.
    #[serde(default)]
    pub length_ms: Option<TimeMs>,
}

impl Project {
    /// Validates internal consistency: every source is well-formed, every
    /// clip is well-formed, every clip's `source_id` resolves, and every
    /// clip's frame range fits inside its source.
    pub fn validate(&self) -> Result<(), MotionError> {
        for source in self.sources.values() {
            source.validate()?;
        }
        for clip in &self.clips {
            clip.validate()?;
            let source = self.sources.get(&clip.source_id).ok_or_else(|| {
                MotionError::invariant(format!(
                    "clip '{}' references unknown source '{}'",
                    clip.id, clip.source_id
                ))
            })?;
            let frame_count = source.frame_count() as u64;
            if clip.out_frame > frame_count {
                return Err(MotionError::invariant(format!(
                    "clip '{}' outFrame {} exceeds source '{}' frame count {}",
                    clip.id, clip.out_frame, clip.source_id, frame_count
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/project.rs"]
mod tests;
