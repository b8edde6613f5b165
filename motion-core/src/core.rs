//! The process-wide entry point: a single coarse mutex around the
//! evaluator, in place of a global mutable singleton.

use std::sync::Mutex;

use crate::config::Config;
use crate::eval::Evaluator;
use crate::foundation::core::{Pose, TimeMs};
use crate::foundation::error::MotionResult;
use crate::project::Project;

/// Guards the sorted clip index, source store, bridge cache, and current
/// project behind one lock, acquired for the duration of `set_project`,
/// `eval_at`, and `eval_range`. This is intentional: bridge-cache writes
/// happen inside the evaluator path.
pub struct Core {
    evaluator: Mutex<Evaluator>,
}

impl Core {
    pub fn new(config: Config) -> Self {
        Self {
            evaluator: Mutex::new(Evaluator::new(config)),
        }
    }

    pub fn set_project(&self, project: Project) -> MotionResult<()> {
        self.evaluator
            .lock()
            .expect("evaluator mutex poisoned")
            .set_project(project)
    }

    pub fn set_config(&self, config: Config) -> MotionResult<()> {
        self.evaluator
            .lock()
            .expect("evaluator mutex poisoned")
            .set_config(config)
    }

    pub fn config(&self) -> Config {
        self.evaluator.lock().expect("evaluator mutex poisoned").config().clone()
    }

    pub fn eval_at(&self, t_ms: TimeMs) -> Pose {
        self.evaluator.lock().expect("evaluator mutex poisoned").eval_at(t_ms)
    }

    pub fn eval_range(&self, t0_ms: TimeMs, t1_ms: TimeMs, step_ms: f64) -> Vec<Pose> {
        self.evaluator
            .lock()
            .expect("evaluator mutex poisoned")
            .eval_range(t0_ms, t1_ms, step_ms)
    }
}
