use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::foundation::core::{zero_pose, DOF};

struct MockDriver {
    connected: AtomicBool,
    ready: AtomicBool,
    teleop_active: AtomicBool,
    reject_after: Option<usize>,
    sends: AtomicUsize,
}

impl MockDriver {
    fn ready_driver() -> Self {
        Self {
            connected: AtomicBool::new(true),
            ready: AtomicBool::new(true),
            teleop_active: AtomicBool::new(false),
            reject_after: None,
            sends: AtomicUsize::new(0),
        }
    }
}

impl RobotDriver for MockDriver {
    fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn teleop_active(&self) -> bool {
        self.teleop_active.load(Ordering::SeqCst)
    }

    fn send_command(&self, _pose: Pose, _min_time_s: f64) -> Result<(), RobotError> {
        let n = self.sends.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.reject_after {
            if n >= limit {
                return Err(RobotError::new("simulated transport failure"));
            }
        }
        Ok(())
    }
}

struct StaticSource;

impl TrajectorySource for StaticSource {
    fn eval_at(&self, _t_ms: TimeMs) -> Pose {
        zero_pose()
    }

    fn eval_range(&self, _t0_ms: TimeMs, _t1_ms: TimeMs, _step_ms: f64) -> Vec<Pose> {
        vec![zero_pose()]
    }
}

struct RampSource;

impl TrajectorySource for RampSource {
    fn eval_at(&self, t_ms: TimeMs) -> Pose {
        [t_ms as f64; DOF]
    }

    fn eval_range(&self, t0_ms: TimeMs, _t1_ms: TimeMs, _step_ms: f64) -> Vec<Pose> {
        vec![[t0_ms as f64; DOF]]
    }
}

fn scheduler() -> (PlaybackScheduler, Arc<MockDriver>) {
    let driver = Arc::new(MockDriver::ready_driver());
    let source: Arc<dyn TrajectorySource> = Arc::new(StaticSource);
    let sched = PlaybackScheduler::new(source, driver.clone() as Arc<dyn RobotDriver>, 0.01);
    (sched, driver)
}

#[test]
fn start_play_rejects_when_robot_not_connected() {
    let driver = Arc::new(MockDriver::ready_driver());
    driver.connected.store(false, Ordering::SeqCst);
    let source: Arc<dyn TrajectorySource> = Arc::new(StaticSource);
    let sched = PlaybackScheduler::new(source, driver as Arc<dyn RobotDriver>, 0.01);
    assert!(sched.start_play(0).is_err());
}

#[test]
fn start_play_rejects_when_teleop_active() {
    let driver = Arc::new(MockDriver::ready_driver());
    driver.teleop_active.store(true, Ordering::SeqCst);
    let source: Arc<dyn TrajectorySource> = Arc::new(StaticSource);
    let sched = PlaybackScheduler::new(source, driver as Arc<dyn RobotDriver>, 0.01);
    assert!(sched.start_play(0).is_err());
}

#[test]
fn seek_is_rejected_while_playing_then_accepted_after_stop() {
    let (sched, _driver) = scheduler();
    sched.start_play(0).expect("preconditions satisfied");
    assert!(sched.seek(500).is_err());
    sched.stop_play();
    assert!(!sched.state().playing);
    assert!(sched.seek(500).is_ok());
    assert_eq!(sched.state().marker_ms, 500);
}

#[test]
fn start_play_transitions_to_playing_and_advances_marker() {
    let driver = Arc::new(MockDriver::ready_driver());
    let source: Arc<dyn TrajectorySource> = Arc::new(RampSource);
    let sched = PlaybackScheduler::new(source, driver as Arc<dyn RobotDriver>, 0.01);
    sched.start_play(0).expect("preconditions satisfied");
    assert!(sched.state().playing);
    std::thread::sleep(Duration::from_millis(50));
    sched.stop_play();
    assert!(!sched.state().playing);
    assert!(sched.state().marker_ms > 0);
}

#[test]
fn transport_failure_stops_playback_automatically() {
    let driver = Arc::new(MockDriver {
        reject_after: Some(1),
        ..MockDriver::ready_driver()
    });
    let source: Arc<dyn TrajectorySource> = Arc::new(StaticSource);
    let sched = PlaybackScheduler::new(source, driver as Arc<dyn RobotDriver>, 0.01);
    sched.start_play(0).expect("initial pre-roll send succeeds");
    std::thread::sleep(Duration::from_millis(100));
    assert!(!sched.state().playing);
}

#[test]
fn stop_play_is_idempotent() {
    let (sched, _driver) = scheduler();
    sched.start_play(0).expect("preconditions satisfied");
    sched.stop_play();
    sched.stop_play();
    assert!(!sched.state().playing);
}

#[test]
fn start_play_rejects_double_start() {
    let (sched, _driver) = scheduler();
    sched.start_play(0).expect("preconditions satisfied");
    assert!(sched.start_play(0).is_err());
    sched.stop_play();
}
