//! Visual-servo domain module
//!
//! Everything the pick-object loop needs that does not touch the network:
//! detection value types, the head/robot state, the per-frame policy, the
//! look-around recovery and the episode record.

pub mod controller;
pub mod detection;
pub mod episode;
pub mod look_around;
pub mod state;

pub use controller::{Decision, Features, ServoConfig, ServoPhase, VisualServoController};
pub use detection::{BoundingBox, BoundingBoxObservation, Detection, DetectionFrame};
pub use episode::{Episode, EpisodeActions, EpisodeEntry};
pub use look_around::{LookAround, LookAroundMove};
pub use state::{CENTER_HEAD, HeadPosition, MAX_HEAD, MIN_HEAD, RobotState};
