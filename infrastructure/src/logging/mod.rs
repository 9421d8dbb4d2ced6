//! Run artefacts on disk: the trial log and pick episodes.
//!
//! Provides [`JsonlTrialLogger`], an append-only JSONL writer implementing
//! the [`TrialLog`](pilot_application::TrialLog) port, and
//! [`JsonEpisodeStore`], which writes one JSON file per pick run.

mod episode_store;
mod trial_logger;

pub use episode_store::JsonEpisodeStore;
pub use trial_logger::{JsonlTrialLogger, read_trial_log};
