//! Action vocabulary
//!
//! The robot's action server only accepts names from its pre-recorded action
//! group. [`ActionVocabulary`] is the closed set a `Propagate Action` step is
//! validated against, and the list the planner is shown on every (re)plan.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Actions recorded in the robot's default action group, in the order the
/// planner is shown them.
pub const DEFAULT_ACTIONS: [&str; 47] = [
    "back",
    "back_end",
    "back_fast",
    "back_one_step",
    "bow",
    "go_forward",
    "go_forward_end",
    "go_forward_fast",
    "go_forward_one_small_step",
    "go_forward_one_step",
    "go_forward_start",
    "go_forward_start_fast",
    "left_kick",
    "left_move_10",
    "left_move_20",
    "left_move_30",
    "left_move",
    "left_move_fast",
    "left_shot",
    "left_shot_fast",
    "left_uppercut",
    "right_kick",
    "right_move_10",
    "right_move_20",
    "right_move_30",
    "right_move",
    "right_move_fast",
    "right_shot",
    "right_shot_fast",
    "right_uppercut",
    "sit_ups",
    "squat",
    "squat_down",
    "squat_up",
    "stand",
    "stand_slow",
    "stand_up_back",
    "stand_up_front",
    "move_up",
    "put_down",
    "wave",
    "wing_chun",
    "catch_ball",
    "catch_ball_up",
    "catch_ball_go",
    "catch_ball_left_move",
    "catch_ball_right_move",
];

/// Action names the visual-servo loop emits.
pub mod names {
    pub const GO_FORWARD: &str = "go_forward";
    pub const LEFT_MOVE: &str = "left_move";
    pub const RIGHT_MOVE: &str = "right_move";
    pub const RIGHT_MOVE_FAST: &str = "right_move_fast";
    pub const CATCH_BALL: &str = "catch_ball";
    /// Suffix for the fast lateral tier (`left_move_fast`)
    pub const FAST_SUFFIX: &str = "_fast";
    /// Suffix for the stepped lateral tier (`left_move_20`)
    pub const STEP_SUFFIX: &str = "_20";
}

/// Closed set of action names accepted by `Propagate Action`.
///
/// Keeps insertion order for prompts and a sorted set for lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ActionVocabulary {
    ordered: Vec<String>,
    lookup: BTreeSet<String>,
}

impl ActionVocabulary {
    pub fn new<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut lookup = BTreeSet::new();
        for action in actions {
            let action = action.into();
            if lookup.insert(action.clone()) {
                ordered.push(action);
            }
        }
        Self { ordered, lookup }
    }

    pub fn contains(&self, action: &str) -> bool {
        self.lookup.contains(action)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(|s| s.as_str())
    }

    /// Comma-separated list for prompt rendering.
    pub fn to_prompt_list(&self) -> String {
        self.ordered.join(", ")
    }
}

impl From<Vec<String>> for ActionVocabulary {
    fn from(actions: Vec<String>) -> Self {
        Self::new(actions)
    }
}

impl From<ActionVocabulary> for Vec<String> {
    fn from(vocab: ActionVocabulary) -> Self {
        vocab.ordered
    }
}

impl Default for ActionVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIONS)
    }
}
