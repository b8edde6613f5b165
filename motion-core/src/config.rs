//! Deployment configuration: per-joint kinematic limits plus the ambient,
//! mostly-inert settings a deployment loads at startup.

use serde::{Deserialize, Serialize};

use crate::bridge::JointLimits;
use crate::foundation::core::DOF;
use crate::foundation::error::MotionError;

fn default_control_dt() -> f64 {
    1.0 / 240.0
}

fn default_period() -> f64 {
    0.01
}

fn default_local_port() -> u16 {
    5005
}

fn default_quest_port() -> u16 {
    6000
}

fn default_quest_ws_min_hz() -> u32 {
    1
}

fn default_quest_ws_max_hz() -> u32 {
    200
}

fn default_quest_ws_default_hz() -> u32 {
    30
}

fn default_v_max() -> [f64; DOF] {
    [3.0; DOF]
}

fn default_a_max() -> [f64; DOF] {
    [4.0; DOF]
}

fn default_j_max() -> [f64; DOF] {
    [40.0; DOF]
}

/// On-disk settings object for a deployment. The joint limit arrays and
/// scheduler periods are load-bearing for bridge synthesis and playback;
/// the `quest_*`/`*_default_port` fields describe a transport that is out
/// of scope for this crate and are carried for config-file fidelity only.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_v_max")]
    pub v_max: [f64; DOF],
    #[serde(default = "default_a_max")]
    pub a_max: [f64; DOF],
    #[serde(default = "default_j_max")]
    pub j_max: [f64; DOF],

    /// Bridge-synthesis step, seconds.
    #[serde(default = "default_control_dt")]
    pub control_dt: f64,
    /// Playback tick period, seconds.
    #[serde(default = "default_period")]
    pub period: f64,

    /// Informational: the port the external local transport process binds
    /// to. This crate does not open sockets.
    #[serde(default = "default_local_port")]
    pub local_default_port: u16,
    /// Informational: the port the external VR-ingestion process binds to.
    #[serde(default = "default_quest_port")]
    pub quest_default_port: u16,
    #[serde(default = "default_quest_ws_min_hz")]
    pub quest_ws_min_hz: u32,
    #[serde(default = "default_quest_ws_max_hz")]
    pub quest_ws_max_hz: u32,
    #[serde(default = "default_quest_ws_default_hz")]
    pub quest_ws_default_hz: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            v_max: default_v_max(),
            a_max: default_a_max(),
            j_max: default_j_max(),
            control_dt: default_control_dt(),
            period: default_period(),
            local_default_port: default_local_port(),
            quest_default_port: default_quest_port(),
            quest_ws_min_hz: default_quest_ws_min_hz(),
            quest_ws_max_hz: default_quest_ws_max_hz(),
            quest_ws_default_hz: default_quest_ws_default_hz(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), MotionError> {
        for (name, arr) in [
            ("vMax", &self.v_max),
            ("aMax", &self.a_max),
            ("jMax", &self.j_max),
        ] {
            if arr.iter().any(|&v| !(v > 0.0) || !v.is_finite()) {
                return Err(MotionError::invariant(format!(
                    "config {name} must be strictly positive and finite in every joint"
                )));
            }
        }
        if !(self.control_dt > 0.0) || !self.control_dt.is_finite() {
            return Err(MotionError::invariant("config controlDt must be positive"));
        }
        if !(self.period > 0.0) || !self.period.is_finite() {
            return Err(MotionError::invariant("config period must be positive"));
        }
        if self.quest_ws_min_hz == 0 || self.quest_ws_min_hz > self.quest_ws_max_hz {
            return Err(MotionError::invariant(
                "config questWsMinHz must be positive and not exceed questWsMaxHz",
            ));
        }
        if self.quest_ws_default_hz < self.quest_ws_min_hz
            || self.quest_ws_default_hz > self.quest_ws_max_hz
        {
            return Err(MotionError::invariant(
                "config questWsDefaultHz must fall within [questWsMinHz, questWsMaxHz]",
            ));
        }
        Ok(())
    }

    /// Per-joint limits in the shape [`crate::bridge::synth::synthesize_bridge`] expects.
    pub fn joint_limits(&self) -> [JointLimits; DOF] {
        let mut out = [JointLimits {
            v_max: 0.0,
            a_max: 0.0,
            j_max: 0.0,
        }; DOF];
        for j in 0..DOF {
            out[j] = JointLimits {
                v_max: self.v_max[j],
                a_max: self.a_max[j],
                j_max: self.j_max[j],
            };
        }
        out
    }
}
