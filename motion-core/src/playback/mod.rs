//! Playback scheduler: a fixed-rate loop that samples the trajectory
//! evaluator and streams joint commands to the robot driver.

pub mod scheduler;

pub use scheduler::{PlaybackScheduler, PlaybackState, RobotDriver, RobotError, TrajectorySource};
