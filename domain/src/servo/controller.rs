//! Visual-servo policy
//!
//! [`VisualServoController::decide`] maps one bounding-box observation to a
//! discrete body action and a head-tilt command. It is pure apart from the
//! `&mut RobotState` it is handed and its own phase bookkeeping; sending the
//! commands is the caller's job.
//!
//! ```text
//!            miss                |dx| > x_thresh
//!  Seeking ◀────── any ───────▶ Centering
//!     │                              │ |dx| ≤ x_thresh
//!     └──────── detection ──────▶ Descending
//!                                    │ head ≤ MIN + tolerance
//!                                  Close ── stability_frames qualifying ──▶ Done
//! ```

use super::detection::BoundingBoxObservation;
use super::state::{HeadPosition, RobotState};
use crate::action::names;
use serde::{Deserialize, Serialize};

/// Tunable constants of the servo policy and the pick loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoConfig {
    /// Frames processed before the pick loop gives up
    pub max_steps: u32,
    /// Horizontal dead zone on |dx|
    pub x_thresh: f64,
    /// |dx| beyond which the fast lateral tier is used
    pub fast_x_thresh: f64,
    /// Vertical error beyond which the head tilts down
    pub y_thresh: f64,
    /// Normalized y the target centre is steered toward
    pub target_bottom_ratio: f64,
    /// Head distance from MIN that counts as close
    pub tolerance: u16,
    /// Consecutive qualifying close frames required to pick
    pub stability_frames: u32,
    /// Consecutive misses tolerated before looking around
    pub max_detection_retries: u32,
    /// Head positions swept by the look-around recovery
    pub look_around_positions: Vec<u16>,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            max_steps: 100,
            x_thresh: 0.2,
            fast_x_thresh: 0.4,
            y_thresh: 0.09,
            target_bottom_ratio: 0.72,
            tolerance: 30,
            stability_frames: 2,
            max_detection_retries: 5,
            look_around_positions: vec![1300, 1700, 1500],
        }
    }
}

impl ServoConfig {
    pub fn with_stability_frames(mut self, frames: u32) -> Self {
        self.stability_frames = frames;
        self
    }

    pub fn with_max_steps(mut self, steps: u32) -> Self {
        self.max_steps = steps;
        self
    }
}

/// Phase of the approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServoPhase {
    /// Target not visible
    #[default]
    Seeking,
    /// Target visible but off to one side
    Centering,
    /// Walking toward the target while tilting the head down
    Descending,
    /// Head near fully down, waiting for a stable centred target
    Close,
    /// Pick triggered
    Done,
}

impl ServoPhase {
    pub fn as_str(&self) -> &str {
        match self {
            ServoPhase::Seeking => "seeking",
            ServoPhase::Centering => "centering",
            ServoPhase::Descending => "descending",
            ServoPhase::Close => "close",
            ServoPhase::Done => "done",
        }
    }
}

impl std::fmt::Display for ServoPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Features of one frame as recorded in an episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub ncx: f64,
    pub ncy: f64,
    pub area: f64,
    pub bottom: f64,
    pub dx: f64,
    pub dy: f64,
    pub prev_action: Option<String>,
}

/// Commands for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: String,
    pub head: HeadPosition,
    pub end: bool,
    #[serde(skip)]
    pub phase: ServoPhase,
}

/// Per-frame policy plus the phase state machine of one pick run
#[derive(Debug, Clone)]
pub struct VisualServoController {
    config: ServoConfig,
    phase: ServoPhase,
    close_frames: u32,
}

impl VisualServoController {
    pub fn new(config: ServoConfig) -> Self {
        Self {
            config,
            phase: ServoPhase::Seeking,
            close_frames: 0,
        }
    }

    pub fn phase(&self) -> ServoPhase {
        self.phase
    }

    pub fn close_frames(&self) -> u32 {
        self.close_frames
    }

    /// Record a frame without a detection. Breaks any run of close frames.
    pub fn note_miss(&mut self) {
        if self.phase != ServoPhase::Done {
            self.phase = ServoPhase::Seeking;
            self.close_frames = 0;
        }
    }

    /// Decide the action and head command for one observation.
    ///
    /// - `dx = ncx - 0.5`, `dy = ncy - target_bottom_ratio`
    /// - `|dx| > x_thresh` steps sideways, fast tier beyond `fast_x_thresh`
    /// - `dy > y_thresh` lowers the head by `dy * (MAX - MIN)`
    /// - once the head is within `tolerance` of MIN, `stability_frames`
    ///   consecutive frames with `|dx| <= x_thresh` and `dy <= y_thresh`
    ///   trigger `catch_ball`
    pub fn decide(
        &mut self,
        obs: &BoundingBoxObservation,
        state: &mut RobotState,
    ) -> (Features, Decision) {
        let cfg = &self.config;
        let dx = obs.norm_center_x - 0.5;
        let dy = obs.norm_center_y - cfg.target_bottom_ratio;

        let features = Features {
            ncx: obs.norm_center_x,
            ncy: obs.norm_center_y,
            area: obs.norm_area,
            bottom: obs.norm_bottom,
            dx,
            dy,
            prev_action: state.last_action.clone(),
        };

        let mut action = names::GO_FORWARD.to_string();
        let mut phase = ServoPhase::Descending;
        let centred = dx.abs() <= cfg.x_thresh;

        if !centred {
            let side = if dx < 0.0 {
                names::LEFT_MOVE
            } else {
                names::RIGHT_MOVE
            };
            let tier = if dx.abs() > cfg.fast_x_thresh {
                names::FAST_SUFFIX
            } else {
                names::STEP_SUFFIX
            };
            action = format!("{}{}", side, tier);
            phase = ServoPhase::Centering;
        }

        let mut head = state.head;
        if dy > cfg.y_thresh {
            head = head.lowered_by(dy * HeadPosition::span());
        }

        let mut end = false;
        if head.near_min(cfg.tolerance) {
            phase = ServoPhase::Close;
            let qualifies = centred && dy <= cfg.y_thresh;
            if qualifies {
                self.close_frames += 1;
            } else {
                self.close_frames = 0;
            }
            if self.close_frames >= cfg.stability_frames {
                action = names::CATCH_BALL.to_string();
                end = true;
                phase = ServoPhase::Done;
            }
        } else {
            self.close_frames = 0;
        }

        self.phase = phase;
        state.head = head;
        state.last_action = Some(action.clone());

        (
            features,
            Decision {
                action,
                head,
                end,
                phase,
            },
        )
    }
}

impl Default for VisualServoController {
    fn default() -> Self {
        Self::new(ServoConfig::default())
    }
}
