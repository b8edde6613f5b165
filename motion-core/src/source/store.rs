//! Source store (C1): validated, materialized per-source frame matrices.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Pose, DOF};
use crate::foundation::error::MotionError;

/// A uniformly-sampled sequence of poses, as submitted by the editor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    /// Frame period, seconds, strictly positive.
    pub dt: f64,
    /// Ordered frames, each of length [`DOF`].
    pub frames: Vec<Pose>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Source {
    pub fn validate(&self) -> Result<(), MotionError> {
        if self.id.is_empty() {
            return Err(MotionError::invariant("source id must not be empty"));
        }
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(MotionError::invariant(format!(
                "source '{}' has non-positive or non-finite dt {}",
                self.id, self.dt
            )));
        }
        if self.frames.is_empty() {
            return Err(MotionError::invariant(format!(
                "source '{}' has no frames",
                self.id
            )));
        }
        for (i, frame) in self.frames.iter().enumerate() {
            if frame.iter().any(|v| !v.is_finite()) {
                return Err(MotionError::invariant(format!(
                    "source '{}' frame {} has a non-finite component",
                    self.id, i
                )));
            }
        }
        Ok(())
    }

    pub fn dt_ms(&self) -> f64 {
        self.dt * 1000.0
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Validated, materialized source frame matrices, keyed by source id.
///
/// `Pose` is already a fixed `[f64; DOF]` array, so "materializing" a source
/// is simply validating it once at `set_project` time rather than on every
/// sample — the evaluator reads `frames` by reference afterward.
#[derive(Debug, Default)]
pub struct SourceStore {
    sources: HashMap<String, Source>,
}

impl SourceStore {
    pub fn build(sources: HashMap<String, Source>) -> Result<Self, MotionError> {
        for source in sources.values() {
            source.validate()?;
        }
        Ok(Self { sources })
    }

    pub fn get(&self, id: &str) -> Option<&Source> {
        self.sources.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
