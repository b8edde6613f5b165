//! Fixed-rate playback loop. Holds injected capability handles for the
//! trajectory evaluator and the robot driver rather than owning either, so
//! the scheduler never needs a back-reference to the evaluator that
//! constructed it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::foundation::core::{Pose, TimeMs};
use crate::foundation::error::{MotionError, MotionResult};

/// The subset of the evaluator the scheduler needs: `eval_at` for the
/// per-tick hot path, `eval_range` for the pre-roll sample. Implemented
/// for [`crate::core::Core`].
pub trait TrajectorySource: Send + Sync {
    fn eval_at(&self, t_ms: TimeMs) -> Pose;
    fn eval_range(&self, t0_ms: TimeMs, t1_ms: TimeMs, step_ms: f64) -> Vec<Pose>;
}

impl TrajectorySource for crate::core::Core {
    fn eval_at(&self, t_ms: TimeMs) -> Pose {
        crate::core::Core::eval_at(self, t_ms)
    }

    fn eval_range(&self, t0_ms: TimeMs, t1_ms: TimeMs, step_ms: f64) -> Vec<Pose> {
        crate::core::Core::eval_range(self, t0_ms, t1_ms, step_ms)
    }
}

/// The robot driver seam: a command sink the scheduler writes to and a
/// small amount of precondition state it reads. External to this crate in
/// a real deployment; in tests and the CLI's `play` subcommand it is a
/// logging stub.
pub trait RobotDriver: Send + Sync {
    /// Whether the transport to the robot is up.
    fn connected(&self) -> bool;
    /// Whether the robot has completed its own readiness checks.
    fn ready(&self) -> bool;
    /// Whether a tele-op session currently owns the command stream.
    /// Checked as a precondition on `start_play`, not raced against:
    /// tele-op exclusion is cooperative, not lock-guarded.
    fn teleop_active(&self) -> bool;
    /// Sends a joint-position command with a minimum execution time.
    fn send_command(&self, pose: Pose, min_time_s: f64) -> Result<(), RobotError>;
    /// Optional joint-limit clamp; the default is the identity.
    fn clip_limits(&self, pose: Pose) -> Pose {
        pose
    }
}

/// A robot driver rejecting a command send.
#[derive(Debug, Error)]
#[error("robot rejected command: {0}")]
pub struct RobotError(pub String);

impl RobotError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Snapshot returned by [`PlaybackScheduler::state`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    pub playing: bool,
    pub marker_ms: TimeMs,
    pub teleop_active: bool,
    pub connected: bool,
    pub ready: bool,
}

struct Inner {
    playing: bool,
    marker_ms: TimeMs,
    join_handle: Option<JoinHandle<()>>,
}

/// Fixed-rate loop that samples a [`TrajectorySource`] and streams
/// commands to a [`RobotDriver`]. One playback loop runs at a time;
/// `start_play`/`stop_play`/`seek` mutate a small piece of shared state
/// guarded by its own mutex, separate from the evaluator's lock — the
/// scheduler thread holds no locks across its sleeps.
pub struct PlaybackScheduler {
    source: Arc<dyn TrajectorySource>,
    driver: Arc<dyn RobotDriver>,
    inner: Arc<Mutex<Inner>>,
    stop_flag: Arc<AtomicBool>,
    period_ms: f64,
}

const PREROLL_MIN_TIME_S: f64 = 2.0;
const JOIN_TIMEOUT: Duration = Duration::from_secs(1);

impl PlaybackScheduler {
    /// `period_s` is the wall-clock control period (`Config::period`,
    /// typically 0.01s / 10ms).
    pub fn new(source: Arc<dyn TrajectorySource>, driver: Arc<dyn RobotDriver>, period_s: f64) -> Self {
        Self {
            source,
            driver,
            inner: Arc::new(Mutex::new(Inner {
                playing: false,
                marker_ms: 0,
                join_handle: None,
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            period_ms: period_s * 1000.0,
        }
    }

    /// `start_play(t0)`: pre-rolls to `t0`'s pose with a 2-second
    /// minimum-time command, then spawns the fixed-rate loop. Rejected if
    /// the robot isn't connected/ready, tele-op is active, or playback is
    /// already running.
    #[tracing::instrument(skip(self))]
    pub fn start_play(&self, t0_ms: TimeMs) -> MotionResult<()> {
        let mut inner = self.inner.lock().expect("scheduler mutex poisoned");
        if inner.playing {
            return Err(MotionError::precondition("playback is already running"));
        }
        if !self.driver.connected() {
            return Err(MotionError::precondition("robot is not connected"));
        }
        if !self.driver.ready() {
            return Err(MotionError::precondition("robot is not ready"));
        }
        if self.driver.teleop_active() {
            return Err(MotionError::precondition(
                "tele-op is active; playback and tele-op are mutually exclusive",
            ));
        }

        let initial = self
            .source
            .eval_range(t0_ms, t0_ms, self.period_ms)
            .into_iter()
            .next()
            .unwrap_or_else(crate::foundation::core::zero_pose);
        let initial = self.driver.clip_limits(initial);
        self.driver
            .send_command(initial, PREROLL_MIN_TIME_S)
            .map_err(|e| MotionError::transport(e.0))?;

        self.stop_flag.store(false, Ordering::SeqCst);
        inner.marker_ms = t0_ms;
        inner.playing = true;

        let source = Arc::clone(&self.source);
        let driver = Arc::clone(&self.driver);
        let inner_handle = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let period_ms = self.period_ms;

        let handle = thread::spawn(move || {
            run_loop(source, driver, inner_handle, stop_flag, t0_ms, period_ms);
        });
        inner.join_handle = Some(handle);

        Ok(())
    }

    /// `seek(marker_ms)`: allowed only while idle.
    pub fn seek(&self, marker_ms: TimeMs) -> MotionResult<()> {
        let mut inner = self.inner.lock().expect("scheduler mutex poisoned");
        if inner.playing {
            return Err(MotionError::precondition("cannot seek while playing"));
        }
        inner.marker_ms = marker_ms;
        Ok(())
    }

    /// `stop_play()`: cooperative cancellation via an atomic flag, joined
    /// with a 1-second timeout; idempotent.
    #[tracing::instrument(skip(self))]
    pub fn stop_play(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        let handle = {
            let mut inner = self.inner.lock().expect("scheduler mutex poisoned");
            inner.join_handle.take()
        };
        if let Some(handle) = handle {
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || {
                let _ = handle.join();
                let _ = tx.send(());
            });
            let _ = rx.recv_timeout(JOIN_TIMEOUT);
        }
        let mut inner = self.inner.lock().expect("scheduler mutex poisoned");
        inner.playing = false;
    }

    /// `state()`: current playback marker plus live driver precondition
    /// state.
    pub fn state(&self) -> PlaybackState {
        let inner = self.inner.lock().expect("scheduler mutex poisoned");
        PlaybackState {
            playing: inner.playing,
            marker_ms: inner.marker_ms,
            teleop_active: self.driver.teleop_active(),
            connected: self.driver.connected(),
            ready: self.driver.ready(),
        }
    }
}

fn run_loop(
    source: Arc<dyn TrajectorySource>,
    driver: Arc<dyn RobotDriver>,
    inner: Arc<Mutex<Inner>>,
    stop_flag: Arc<AtomicBool>,
    t0_ms: TimeMs,
    period_ms: f64,
) {
    let start = Instant::now();
    let min_time_s = 1.01 * period_ms / 1000.0;
    let mut k: u64 = 0;
    loop {
        if stop_flag.load(Ordering::SeqCst) {
            break;
        }
        k += 1;
        let marker = t0_ms + (k as f64 * period_ms).round() as TimeMs;
        let pose = source.eval_at(marker);
        let pose = driver.clip_limits(pose);
        match driver.send_command(pose, min_time_s) {
            Ok(()) => {
                inner.lock().expect("scheduler mutex poisoned").marker_ms = marker;
            }
            Err(e) => {
                tracing::error!(error = %e, marker_ms = marker, "robot rejected command, stopping playback");
                stop_flag.store(true, Ordering::SeqCst);
                break;
            }
        }
        // Absolute wall-clock scheduling: if a tick runs late, skip the
        // sleep rather than bursting to catch up.
        let next_wake = start + Duration::from_secs_f64(k as f64 * period_ms / 1000.0);
        let now = Instant::now();
        if now < next_wake {
            thread::sleep(next_wake - now);
        }
    }
    inner.lock().expect("scheduler mutex poisoned").playing = false;
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
