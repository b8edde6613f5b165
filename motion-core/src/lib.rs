//! Motion timeline core for a bimanual humanoid teleoperation and
//! motion-editing system.
//!
//! The crate accepts a [`Project`] of motion [`source::Source`]s and
//! time-placed [`timeline::Clip`]s over a 24-degree-of-freedom pose and
//! produces a continuous, kinematically feasible trajectory at any
//! requested millisecond timestamp via [`Core::eval_at`]/[`Core::eval_range`].
//! It also drives the real-time robot playback loop
//! ([`playback::PlaybackScheduler`]) that consumes this trajectory.
//!
//! # Pipeline overview
//!
//! 1. **Source store + clip index** ([`source`], [`timeline`]): validated
//!    per-source frame matrices and a sorted-by-start-time clip list.
//! 2. **Sample + blend** ([`sample`]): sub-frame linear interpolation within
//!    a clip, then deterministic override/crossfade/additive composition of
//!    every clip active at an instant.
//! 3. **Bridge** ([`bridge`]): when no clip covers an instant, a
//!    jerk-limited, position/velocity-matched trajectory is synthesized
//!    across the gap and memoized.
//! 4. **Evaluate** ([`eval`]): ties 1-3 together behind `eval_at`/`eval_range`.
//! 5. **Play** ([`playback`]): a fixed-rate loop that samples the evaluator
//!    and streams joint commands to an injected robot driver.
//!
//! HTTP/WebSocket transport, project persistence, the tele-op master-arm/
//! gripper drivers, VR head-tracking ingestion, and the robot SDK are out of
//! scope; they are modeled only at their interface seams
//! ([`playback::RobotDriver`], [`csv_export`]).

pub mod bridge;
pub mod config;
pub mod core;
pub mod csv_export;
pub mod eval;
pub mod foundation;
pub mod playback;
pub mod project;
pub mod sample;
pub mod source;
pub mod timeline;

pub use bridge::{synthesize_bridge, BridgeCache, BridgeKey, BridgeTrajectory, JointLimits};
pub use config::Config;
pub use core::Core;
pub use csv_export::export_csv;
pub use eval::{compose_no_bridge, Evaluator};
pub use foundation::core::{pose_is_finite, zero_pose, Pose, TimeMs, DOF};
pub use foundation::error::{MotionError, MotionResult};
pub use playback::{PlaybackScheduler, PlaybackState, RobotDriver, RobotError, TrajectorySource};
pub use project::Project;
pub use sample::{combine_stack, contribution_weight, ramp_weight, sample_clip_at, StackEntry};
pub use source::{Source, SourceStore};
pub use timeline::{Blend, BlendMode, Clip, ClipIndex, Curve};
