//! Robot head and loop state

use serde::{Deserialize, Serialize};

/// Lowest head-tilt pulse width (looking fully down)
pub const MIN_HEAD: u16 = 1000;
/// Highest head-tilt pulse width (looking fully up)
pub const MAX_HEAD: u16 = 2000;
/// Head looking straight ahead
pub const CENTER_HEAD: u16 = 1500;

/// Head-tilt servo pulse width, always within `[MIN_HEAD, MAX_HEAD]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub struct HeadPosition(u16);

impl HeadPosition {
    pub const MIN: HeadPosition = HeadPosition(MIN_HEAD);
    pub const MAX: HeadPosition = HeadPosition(MAX_HEAD);
    pub const CENTER: HeadPosition = HeadPosition(CENTER_HEAD);

    /// Clamp `value` into the servo range.
    pub fn new(value: u16) -> Self {
        Self(value.clamp(MIN_HEAD, MAX_HEAD))
    }

    /// Clamp a computed (possibly fractional or negative) position.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::CENTER;
        }
        Self(value.round().clamp(f64::from(MIN_HEAD), f64::from(MAX_HEAD)) as u16)
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Tilt down by `delta` pulse units, clamped.
    pub fn lowered_by(self, delta: f64) -> Self {
        Self::from_f64(f64::from(self.0) - delta)
    }

    /// Whether the head is within `tolerance` of fully down.
    pub fn near_min(self, tolerance: u16) -> bool {
        self.0 <= MIN_HEAD.saturating_add(tolerance)
    }

    /// Full servo span, `MAX - MIN`.
    pub fn span() -> f64 {
        f64::from(MAX_HEAD - MIN_HEAD)
    }
}

impl Default for HeadPosition {
    fn default() -> Self {
        Self::CENTER
    }
}

impl From<u16> for HeadPosition {
    fn from(value: u16) -> Self {
        Self::new(value)
    }
}

impl From<HeadPosition> for u16 {
    fn from(head: HeadPosition) -> Self {
        head.0
    }
}

impl std::fmt::Display for HeadPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State carried across frames of one pick run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RobotState {
    pub last_action: Option<String>,
    pub head: HeadPosition,
}

impl RobotState {
    pub fn new() -> Self {
        Self::default()
    }
}
