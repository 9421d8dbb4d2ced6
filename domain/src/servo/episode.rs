//! Episode records of a pick run

use super::controller::{Decision, Features};
use super::state::HeadPosition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Commands issued for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeActions {
    pub action: String,
    pub head: HeadPosition,
    pub end: bool,
}

impl From<&Decision> for EpisodeActions {
    fn from(decision: &Decision) -> Self {
        Self {
            action: decision.action.clone(),
            head: decision.head,
            end: decision.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEntry {
    pub features: Features,
    pub actions: EpisodeActions,
    pub success: bool,
}

/// Frames of one pick run keyed by loop step index.
///
/// Serializes as `{"0": {...}, "3": {...}}`; steps without a detection
/// have no entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Episode {
    entries: BTreeMap<u32, EpisodeEntry>,
}

impl Episode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: u32, features: Features, decision: &Decision) {
        self.entries.insert(
            step,
            EpisodeEntry {
                features,
                actions: decision.into(),
                success: decision.end,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&u32, &EpisodeEntry)> {
        self.entries.iter()
    }

    /// Actions in step order.
    pub fn actions(&self) -> Vec<String> {
        self.entries
            .values()
            .map(|entry| entry.actions.action.clone())
            .collect()
    }

    pub fn succeeded(&self) -> bool {
        self.entries.values().any(|entry| entry.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servo::controller::ServoPhase;

    fn features() -> Features {
        Features {
            ncx: 0.5,
            ncy: 0.72,
            area: 0.1,
            bottom: 0.8,
            dx: 0.0,
            dy: 0.0,
            prev_action: None,
        }
    }

    fn decision(action: &str, end: bool) -> Decision {
        Decision {
            action: action.to_string(),
            head: HeadPosition::new(1400),
            end,
            phase: ServoPhase::Descending,
        }
    }

    #[test]
    fn test_episode_json_shape() {
        let mut episode = Episode::new();
        episode.record(0, features(), &decision("go_forward", false));
        episode.record(3, features(), &decision("catch_ball", true));

        let value = serde_json::to_value(&episode).unwrap();
        assert_eq!(value["0"]["actions"]["action"], "go_forward");
        assert_eq!(value["0"]["actions"]["head"], 1400);
        assert_eq!(value["3"]["success"], true);
        assert_eq!(value["0"]["features"]["prev_action"], serde_json::Value::Null);
        assert!(value.get("1").is_none());
    }

    #[test]
    fn test_actions_and_success() {
        let mut episode = Episode::new();
        episode.record(2, features(), &decision("left_move_20", false));
        episode.record(1, features(), &decision("go_forward", false));
        assert_eq!(episode.actions(), vec!["go_forward", "left_move_20"]);
        assert!(!episode.succeeded());
    }
}
