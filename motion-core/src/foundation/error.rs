//! The crate-wide error type and result alias.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type MotionResult<T> = Result<T, MotionError>;

/// The error kinds carried as tagged variants rather than thrown. A
/// missing project is documented behavior, not a failure path, and is
/// therefore not a variant here: `eval_at`/`eval_range` return a zero pose
/// directly instead of an error.
#[derive(Debug, Error)]
pub enum MotionError {
    /// Project shape is invalid: bad frame matrix, `outFrame <= inFrame`,
    /// unknown `sourceId`, non-positive `dt`. Raised only from `set_project`.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A bridge solve failed twice (original attempt, then jerk x1.25) for
    /// at least one joint. Recovered locally by holding the previous pose;
    /// this variant exists so the recovery can be logged and, in tests,
    /// observed.
    #[error("bridge infeasible: {0}")]
    BridgeInfeasible(String),

    /// A playback operation's precondition was not met (robot not ready,
    /// tele-op active, already playing, etc).
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// The robot driver rejected a command send.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// Anything else, typically from an adapter at the process boundary.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MotionError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn bridge_infeasible(msg: impl Into<String>) -> Self {
        Self::BridgeInfeasible(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionFailed(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportFailure(msg.into())
    }
}
