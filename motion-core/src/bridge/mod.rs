//! Jerk-limited bridge synthesis (C5) and its cache (C6).

pub mod cache;
pub mod synth;

pub use cache::{BridgeCache, BridgeCacheItem, BridgeKey};
pub use synth::{synthesize_bridge, BridgeTrajectory, JointLimits};
